//! Combat system - projectiles, damage, hit detection

use super::geometry::{direction_from_angle, Rect};
use super::maps::Arena;
use super::obstacle::ObstacleField;

/// Active projectile in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Center position
    pub x: f32,
    pub y: f32,
    /// Unit direction
    pub dir_x: f32,
    pub dir_y: f32,
    /// Travel per frame
    pub speed: f32,
    pub damage: f32,
    /// Side length of the square hitbox
    pub size: f32,
}

/// Why a projectile left play during its own update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    /// Still in flight
    Flying,
    /// Center left the arena
    OutOfBounds,
    /// Hitbox touched a bullet-blocking obstacle
    Blocked,
}

impl Projectile {
    /// Create a projectile centered at `(x, y)` travelling along `angle`
    pub fn new(x: f32, y: f32, angle: f32, speed: f32, damage: f32, size: f32) -> Self {
        let (dir_x, dir_y) = direction_from_angle(angle);
        Self {
            x,
            y,
            dir_x,
            dir_y,
            speed,
            damage,
            size,
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.size, self.size)
    }

    /// Advance one frame and report whether the projectile survives
    pub fn advance(&mut self, arena: Arena, obstacles: Option<&ObstacleField>) -> ProjectileFate {
        self.x += self.dir_x * self.speed;
        self.y += self.dir_y * self.speed;

        if self.x < 0.0 || self.x > arena.width || self.y < 0.0 || self.y > arena.height {
            return ProjectileFate::OutOfBounds;
        }

        if obstacles.is_some_and(|field| field.blocks_projectile(&self.hitbox())) {
            return ProjectileFate::Blocked;
        }

        ProjectileFate::Flying
    }

    /// Check collision with a target hull
    pub fn check_hit(&self, target: &Rect) -> bool {
        self.hitbox().intersects(target)
    }
}

/// Stateless damage rules
pub struct CombatSystem;

impl CombatSystem {
    /// Check if enough time has passed since the last use of a cooldown-gated action
    pub fn cooldown_ready(last_used: Option<u64>, now: u64, cooldown_ms: u64) -> bool {
        match last_used {
            Some(at) => now.saturating_sub(at) >= cooldown_ms,
            None => true,
        }
    }

    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: f32, damage: f32) -> (f32, bool) {
        let new_health = (current_health - damage).max(0.0);
        (new_health, new_health <= 0.0)
    }
}

/// Result of a single damage application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Health was removed (clamped to what was left)
    Applied { removed: f32, killed: bool },
    /// Negated by an active shield
    Shielded,
    /// Target already dead or amount not positive
    Ignored,
}

impl DamageOutcome {
    pub fn removed(&self) -> f32 {
        match self {
            Self::Applied { removed, .. } => *removed,
            Self::Shielded | Self::Ignored => 0.0,
        }
    }

    pub fn killed(&self) -> bool {
        matches!(self, Self::Applied { killed: true, .. })
    }
}

/// Hit confirmed during collision resolution
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub shooter: usize,
    pub target: usize,
    /// Damage carried by the projectile
    pub damage: f32,
    pub outcome: DamageOutcome,
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::Obstacle;

    #[test]
    fn projectile_moves_along_direction() {
        let mut p = Projectile::new(100.0, 100.0, 0.0, 7.0, 10.0, 8.0);
        assert_eq!(p.advance(Arena::default(), None), ProjectileFate::Flying);
        assert!((p.x - 107.0).abs() < 1e-4);
        assert!((p.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn projectile_leaves_arena() {
        let mut p = Projectile::new(795.0, 300.0, 0.0, 7.0, 10.0, 8.0);
        assert_eq!(p.advance(Arena::default(), None), ProjectileFate::OutOfBounds);

        let mut p = Projectile::new(300.0, 3.0, -std::f32::consts::FRAC_PI_2, 7.0, 10.0, 8.0);
        assert_eq!(p.advance(Arena::default(), None), ProjectileFate::OutOfBounds);
    }

    #[test]
    fn projectile_stopped_by_wall_not_slow_zone() {
        let field = ObstacleField::new(vec![
            Obstacle::slow(200.0, 280.0, 50.0, 50.0),
            Obstacle::wall(300.0, 280.0, 20.0, 50.0),
        ]);
        let mut p = Projectile::new(190.0, 300.0, 0.0, 10.0, 10.0, 8.0);
        let mut fates = Vec::new();
        for _ in 0..12 {
            let fate = p.advance(Arena::default(), Some(&field));
            fates.push(fate);
            if fate != ProjectileFate::Flying {
                break;
            }
        }
        assert_eq!(fates.last(), Some(&ProjectileFate::Blocked));
        // 200..300 clear, blocked once the hitbox reaches x > 296
        assert_eq!(fates.len(), 11);
    }

    #[test]
    fn cooldown_gate() {
        assert!(CombatSystem::cooldown_ready(None, 0, 250));
        assert!(!CombatSystem::cooldown_ready(Some(1000), 1249, 250));
        assert!(CombatSystem::cooldown_ready(Some(1000), 1250, 250));
    }

    #[test]
    fn damage_never_goes_below_zero() {
        assert_eq!(CombatSystem::apply_damage(50.0, 10.0), (40.0, false));
        assert_eq!(CombatSystem::apply_damage(5.0, 10.0), (0.0, true));
    }
}
