//! Frame pacing
//!
//! Turns host frame callbacks (millisecond timestamps) into the bounded
//! `dt` the simulation consumes. Frames arriving faster than the target
//! rate are dropped; slower hosts simply run slower.

use crate::consts::{FRAME_INTERVAL_MS, MAX_FRAME_DELTA_MS};

/// What to do with a host frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameDecision {
    /// Too soon after the last simulated frame
    Dropped,
    /// Viewport is portrait; simulation is held
    Paused,
    /// Simulate this many seconds
    Step(f32),
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame_ms: f64,
    last_step_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what the host frame at `timestamp_ms` should do
    pub fn advance(&mut self, timestamp_ms: f64, portrait: bool) -> FrameDecision {
        let elapsed = timestamp_ms - self.last_frame_ms;
        if elapsed < FRAME_INTERVAL_MS {
            return FrameDecision::Dropped;
        }
        // Keep the cadence aligned to the interval grid
        self.last_frame_ms = timestamp_ms - elapsed % FRAME_INTERVAL_MS;

        if portrait {
            self.last_step_ms = Some(timestamp_ms);
            return FrameDecision::Paused;
        }

        let last = self.last_step_ms.unwrap_or(timestamp_ms);
        let delta = (timestamp_ms - last).min(MAX_FRAME_DELTA_MS);
        self.last_step_ms = Some(timestamp_ms);
        FrameDecision::Step((delta / 1000.0) as f32)
    }

    /// Forget the last step so the next frame starts from zero
    pub fn reset(&mut self) {
        self.last_step_ms = None;
    }
}
