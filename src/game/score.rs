//! Match scoring

/// Upper bound of a single match score
pub const MAX_SCORE: i32 = 10_000;

const DAMAGE_WEIGHT: f64 = 5_000.0;
const SURVIVAL_WEIGHT: f64 = 5_000.0;
// Victory bonus of 1.2 as a fraction, exact for whole-number totals
const VICTORY_NUMERATOR: f64 = 12.0;
const VICTORY_DENOMINATOR: f64 = 10.0;

/// Inputs for one seat's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    /// Total damage this seat dealt
    pub damage_dealt: f32,
    /// Total damage this seat received
    pub damage_received: f32,
    pub self_max_health: f32,
    pub opponent_max_health: f32,
    pub victorious: bool,
}

/// Score for one seat.
///
/// Damage and survival halves are summed and capped, the winner's total is
/// scaled by 1.2, floored, then capped again. Survival may go negative when
/// received damage exceeds max health.
pub fn score(input: ScoreInput) -> i32 {
    let damage = weighted(DAMAGE_WEIGHT, input.damage_dealt, input.opponent_max_health);
    let survival =
        SURVIVAL_WEIGHT - weighted(SURVIVAL_WEIGHT, input.damage_received, input.self_max_health);

    let base = (damage + survival).min(MAX_SCORE as f64);
    let scaled = if input.victorious {
        base * VICTORY_NUMERATOR / VICTORY_DENOMINATOR
    } else {
        base
    };

    (scaled.floor() as i32).min(MAX_SCORE)
}

/// `weight * amount / max`, zero for a degenerate max
fn weighted(weight: f64, amount: f32, max: f32) -> f64 {
    if max > 0.0 {
        weight * amount as f64 / max as f64
    } else {
        0.0
    }
}
