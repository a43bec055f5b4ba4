//! Game simulation modules

pub mod class;
pub mod combat;
pub mod combatant;
pub mod geometry;
pub mod maps;
pub mod r#match;
pub mod obstacle;
pub mod physics;
pub mod score;
pub mod snapshot;

pub use class::{CatalogError, ClassCatalog, ClassProfile};
pub use combatant::Combatant;
pub use maps::{Arena, MapCatalog};
pub use r#match::{GameMatch, MatchError, MatchPhase, MatchRecord, MatchSetup, PlayerSlot, TickOutcome, Winner};

/// Per-frame intent of one seat, produced by the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Horizontal stick, -1.0 (left) ..= 1.0 (right)
    pub dx: f32,
    /// Vertical stick, -1.0 (up) ..= 1.0 (down)
    pub dy: f32,
    pub fire: bool,
    pub shield: bool,
    /// Request to discard the running match
    pub abort: bool,
}

impl Intent {
    pub fn movement(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            ..Self::default()
        }
    }

    /// Drop an unusable stick vector.
    ///
    /// Any non-finite or out-of-range axis zeroes the whole movement; buttons
    /// are kept.
    pub fn sanitized(self) -> Self {
        let valid = |v: f32| v.is_finite() && (-1.0..=1.0).contains(&v);
        if valid(self.dx) && valid(self.dy) {
            self
        } else {
            Self {
                dx: 0.0,
                dy: 0.0,
                ..self
            }
        }
    }
}

/// Timing and tuning shared by every match of the process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRules {
    /// Total time budget
    pub match_duration_ms: u64,
    /// Delay between game over and returning to the lobby
    pub game_over_grace_ms: u64,
    pub shield_duration_ms: u64,
    pub shield_cooldown_ms: u64,
    /// Hits closer together than this extend the combo
    pub combo_window_ms: u64,
    pub combo_step: f32,
    pub combo_max: f32,
    /// Side length of projectile hitboxes
    pub bullet_size: f32,
    /// Cannon length as a fraction of hull size
    pub cannon_ratio: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            match_duration_ms: 180_000,
            game_over_grace_ms: 3_000,
            shield_duration_ms: 2_000,
            shield_cooldown_ms: 5_000,
            combo_window_ms: 2_000,
            combo_step: 0.1,
            combo_max: 2.0,
            bullet_size: 8.0,
            cannon_ratio: 0.8,
        }
    }
}
