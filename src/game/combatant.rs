//! One ship: movement, firing, shield and health

use tracing::debug;

use super::class::ClassProfile;
use super::combat::{CombatSystem, DamageOutcome, Projectile, ProjectileFate};
use super::geometry::Rect;
use super::maps::Arena;
use super::obstacle::ObstacleField;
use super::physics::PhysicsSystem;
use super::MatchRules;

/// Lifecycle state derived from health and shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatantState {
    Alive,
    /// Alive with the shield up
    Shielded,
    Dead,
}

/// Authoritative state of one seat
#[derive(Debug, Clone)]
pub struct Combatant {
    /// Seat, 0 or 1
    pub index: usize,
    pub profile: ClassProfile,

    // Hull top-left corner
    pub x: f32,
    pub y: f32,
    /// Last nonzero movement direction, radians
    pub facing: f32,

    health: f32,
    projectiles: Vec<Projectile>,

    // Timers, match clock milliseconds
    last_shot_at: Option<u64>,
    last_shield_at: Option<u64>,
    shield_started_at: Option<u64>,
    shield_active: bool,
}

impl Combatant {
    pub fn new(index: usize, profile: ClassProfile, x: f32, y: f32, facing: f32) -> Self {
        Self {
            index,
            health: profile.health,
            profile,
            x,
            y,
            facing,
            projectiles: Vec::new(),
            last_shot_at: None,
            last_shield_at: None,
            shield_started_at: None,
            shield_active: false,
        }
    }

    pub fn hull(&self) -> Rect {
        Rect::new(self.x, self.y, self.profile.size, self.profile.size)
    }

    pub fn center(&self) -> (f32, f32) {
        self.hull().center()
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.profile.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn shield_active(&self) -> bool {
        self.shield_active
    }

    pub fn state(&self) -> CombatantState {
        if !self.is_alive() {
            CombatantState::Dead
        } else if self.shield_active {
            CombatantState::Shielded
        } else {
            CombatantState::Alive
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Remove a projectile after it hit something
    pub(crate) fn consume_projectile(&mut self, idx: usize) -> Option<Projectile> {
        (idx < self.projectiles.len()).then(|| self.projectiles.remove(idx))
    }

    /// Apply one frame of stick input
    pub fn move_by(&mut self, dx: f32, dy: f32, obstacles: Option<&ObstacleField>, arena: Arena) {
        if !self.is_alive() {
            return;
        }

        let (dx, dy) = match PhysicsSystem::normalize(dx, dy) {
            Some((nx, ny)) => {
                self.facing = ny.atan2(nx);
                (nx, ny)
            }
            None => (0.0, 0.0),
        };

        let (x, y) = PhysicsSystem::step(
            self.hull(),
            dx,
            dy,
            self.profile.move_speed,
            obstacles,
            arena,
        );
        self.x = x;
        self.y = y;
    }

    /// Fire along the facing direction. Returns true if a projectile was spawned.
    pub fn shoot(&mut self, now: u64, rules: &MatchRules) -> bool {
        if !self.is_alive()
            || !CombatSystem::cooldown_ready(self.last_shot_at, now, self.profile.fire_cooldown_ms)
        {
            return false;
        }

        let (cx, cy) = self.center();
        let cannon = self.profile.cannon_length(rules.cannon_ratio);
        let projectile = Projectile::new(
            cx + self.facing.cos() * cannon,
            cy + self.facing.sin() * cannon,
            self.facing,
            self.profile.bullet_speed,
            self.profile.damage,
            rules.bullet_size,
        );

        self.projectiles.push(projectile);
        self.last_shot_at = Some(now);
        true
    }

    /// Raise the shield. Returns true if it went up.
    pub fn activate_shield(&mut self, now: u64, rules: &MatchRules) -> bool {
        if !self.is_alive()
            || self.shield_active
            || !CombatSystem::cooldown_ready(self.last_shield_at, now, rules.shield_cooldown_ms)
        {
            return false;
        }

        self.shield_active = true;
        self.shield_started_at = Some(now);
        self.last_shield_at = Some(now);
        debug!(seat = self.index, now, "Shield up");
        true
    }

    /// Advance timers and own projectiles by one frame.
    /// Returns how many projectiles left play.
    pub fn update(
        &mut self,
        now: u64,
        rules: &MatchRules,
        arena: Arena,
        obstacles: Option<&ObstacleField>,
    ) -> usize {
        if self.shield_active {
            let started = self.shield_started_at.unwrap_or(now);
            if now.saturating_sub(started) >= rules.shield_duration_ms {
                self.shield_active = false;
                debug!(seat = self.index, now, "Shield down");
            }
        }

        let before = self.projectiles.len();
        self.projectiles
            .retain_mut(|p| p.advance(arena, obstacles) == ProjectileFate::Flying);
        before - self.projectiles.len()
    }

    /// Take a hit. Fully negated while the shield is up; no-op once dead.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || amount.is_nan() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        if self.shield_active {
            return DamageOutcome::Shielded;
        }
        let before = self.health;
        let (health, killed) = CombatSystem::apply_damage(self.health, amount);
        self.health = health;
        DamageOutcome::Applied {
            removed: before - health,
            killed,
        }
    }
}
