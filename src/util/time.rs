//! Time utilities for the frame loop

use std::time::{Duration, Instant};

/// Milliseconds on the match clock. All simulation timers are expressed in these.
pub type Millis = u64;

/// Default frame rate of the runner
pub const DEFAULT_FPS: u32 = 60;

/// Duration of one frame at the given rate (a rate of 0 is treated as 1)
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / fps.max(1) as u64)
}

/// Elapsed milliseconds between two clock readings, saturating at zero
/// if the clock was read out of order.
pub fn elapsed_since(earlier: Millis, now: Millis) -> Millis {
    now.saturating_sub(earlier)
}

/// Monotonic clock feeding `now` into the simulation
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
