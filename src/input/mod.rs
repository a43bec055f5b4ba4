//! Input sources feeding per-frame intents

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::Intent;

/// Stick values below this magnitude read as centered
pub const STICK_DEADZONE: f32 = 0.2;

/// Zero out stick noise around the center, per axis
pub fn apply_deadzone(value: f32) -> f32 {
    if value.abs() < STICK_DEADZONE {
        0.0
    } else {
        value
    }
}

/// Anything that can produce an intent for a seat each frame
pub trait InputSource {
    fn poll(&mut self, seat: usize) -> Intent;

    /// Intents for both seats, in seat order
    fn poll_both(&mut self) -> [Intent; 2] {
        [self.poll(0), self.poll(1)]
    }
}

/// Seat with no controller attached
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _seat: usize) -> Intent {
        Intent::default()
    }
}

/// Seeded random stick and button noise for headless soak runs.
///
/// Each seat holds a direction for a number of frames before picking a new one.
#[derive(Debug, Clone)]
pub struct NoiseInput {
    rng: ChaCha8Rng,
    held: [Intent; 2],
    hold_frames: [u32; 2],
}

impl NoiseInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: [Intent::default(); 2],
            hold_frames: [0; 2],
        }
    }
}

impl InputSource for NoiseInput {
    fn poll(&mut self, seat: usize) -> Intent {
        if self.hold_frames[seat] == 0 {
            let dx = apply_deadzone(self.rng.gen_range(-1.0..=1.0));
            let dy = apply_deadzone(self.rng.gen_range(-1.0..=1.0));
            self.held[seat] = Intent::movement(dx, dy);
            self.hold_frames[seat] = self.rng.gen_range(10..60);
        }
        self.hold_frames[seat] -= 1;

        Intent {
            fire: self.rng.gen_bool(0.2),
            shield: self.rng.gen_bool(0.01),
            ..self.held[seat]
        }
    }
}
