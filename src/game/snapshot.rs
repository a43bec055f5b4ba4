//! Per-frame view of a match for the renderer

use serde::Serialize;

use super::combat::{DamageOutcome, HitResult};
use super::r#match::{GameMatch, MatchPhase, Winner};

/// Projectile position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
}

/// One seat as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantSnapshot {
    pub seat: usize,
    pub class_id: String,
    pub color: [u8; 3],
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield_active: bool,
    pub combo: f32,
    /// Provisional while running, final once closed
    pub score: i32,
    pub projectiles: Vec<ProjectileSnapshot>,
}

/// Hit flash for effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitSnapshot {
    pub shooter: usize,
    pub target: usize,
    pub x: f32,
    pub y: f32,
    pub blocked_by_shield: bool,
}

impl From<&HitResult> for HitSnapshot {
    fn from(hit: &HitResult) -> Self {
        Self {
            shooter: hit.shooter,
            target: hit.target,
            x: hit.x,
            y: hit.y,
            blocked_by_shield: matches!(hit.outcome, DamageOutcome::Shielded),
        }
    }
}

/// Full match view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub frame: u64,
    pub phase: MatchPhase,
    pub remaining_ms: u64,
    pub over: bool,
    pub winner: Option<Winner>,
    pub combatants: Vec<CombatantSnapshot>,
    pub hits: Vec<HitSnapshot>,
}

impl MatchSnapshot {
    /// Capture the current state of a match
    pub fn capture(game: &GameMatch) -> Self {
        let combatants = game
            .combatants()
            .iter()
            .map(|c| CombatantSnapshot {
                seat: c.index,
                class_id: c.profile.id.clone(),
                color: c.profile.color,
                x: c.x,
                y: c.y,
                size: c.profile.size,
                facing: c.facing,
                health: c.health(),
                max_health: c.max_health(),
                shield_active: c.shield_active(),
                combo: game.combo(c.index),
                score: game.score(c.index),
                projectiles: c
                    .projectiles()
                    .iter()
                    .map(|p| ProjectileSnapshot { x: p.x, y: p.y })
                    .collect(),
            })
            .collect();

        Self {
            frame: game.frame(),
            phase: game.phase(),
            remaining_ms: game.remaining_ms(),
            over: game.is_over(),
            winner: game.winner(),
            combatants,
            hits: game.last_hits().iter().map(HitSnapshot::from).collect(),
        }
    }

    /// Remaining time as `MM:SS`
    pub fn clock_label(&self) -> String {
        let minutes = self.remaining_ms / 60_000;
        let seconds = (self.remaining_ms % 60_000) / 1_000;
        format!("{minutes:02}:{seconds:02}")
    }
}
