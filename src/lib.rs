//! Schrödinger Runner - simulation core of a color-matching runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, track generation, collisions, modes)
//! - `platform`: Loop driver and input mapping for the host
//! - `session`: Owns a run plus its clock and collaborators
//! - `tuning`: Difficulty/progression table
//! - `settings`: Run configuration (JSON)

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{RunListener, Session};
pub use settings::{ConfigError, Loadout, Settings, Theme};
pub use tuning::{Difficulty, DifficultyProfile, DifficultyTable};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the loop driver
    pub const TARGET_FPS: f64 = 60.0;
    /// Minimum interval between simulated frames (ms)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / TARGET_FPS;
    /// Largest host delta fed to the simulation (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
    /// Physics constants are tuned per 1/60 s
    pub const FRAME_SCALE: f32 = 60.0;

    /// Ground line sits this far above the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 100.0;

    /// Player box and fixed lane
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 44.0;
    pub const PLAYER_HEIGHT: f32 = 44.0;

    /// Invulnerability windows (ms)
    pub const SHIELD_INVULNERABILITY_MS: f32 = 1000.0;
    pub const MODE_EXIT_INVULNERABILITY_MS: f32 = 3000.0;
    pub const REVIVE_INVULNERABILITY_MS: f32 = 3000.0;
    /// Revive lifts the player this far above the ground
    pub const REVIVE_LIFT: f32 = 10.0;

    /// Hitbox tolerance for obstacle contact (px, every side)
    pub const OBSTACLE_INSET: f32 = 3.0;
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;
    /// Anything left of this x has scrolled out for good
    pub const RETIRE_X: f32 = -100.0;
    /// Track keeps this much ribbon beyond the right edge
    pub const LOOK_AHEAD: f32 = 200.0;
    /// Probability an obstacle slot is actually filled
    pub const OBSTACLE_FILL_CHANCE: f32 = 0.9;

    /// Speed step applied on acceleration frames
    pub const SPEED_INCREMENT: f32 = 1.0;
    /// Score granted by the wormhole loadout
    pub const WORMHOLE_START_SCORE: f64 = 1000.0;
    pub const WORMHOLE_SPEED_BONUS: f32 = 2.0;
    /// End-of-run currency: one unit per this many points
    pub const SCORE_PER_CURRENCY: f64 = 10.0;

    /// Portals
    pub const PORTAL_FIRST_SPAWN_SECS: f32 = 5.0;
    pub const PORTAL_INTERVAL_MIN_SECS: f32 = 20.0;
    pub const PORTAL_INTERVAL_SPREAD_SECS: f32 = 10.0;
    pub const PORTAL_RADIUS: f32 = 45.0;
    /// Added to the portal radius for the center distance test
    pub const PORTAL_HIT_SLACK: f32 = 40.0;
    pub const PORTAL_AIRBORNE_CHANCE: f32 = 0.7;
    /// Portals drift this much faster than the track
    pub const PORTAL_SPEED_FACTOR: f32 = 1.2;
    pub const PORTAL_SPIN: f32 = 2.0;
    pub const PORTAL_PULSE_RATE: f32 = 5.0;
    pub const MAX_PORTALS: usize = 3;

    /// Bonus mode durations (s)
    pub const SUBMERGED_DURATION: f32 = 10.0;
    pub const AIRBORNE_DURATION: f32 = 10.0;
    /// Per-frame score rates in the bonus modes, before the difficulty multiplier
    pub const SUBMERGED_SCORE_RATE: f64 = 1.0;
    pub const AIRBORNE_SCORE_RATE: f64 = 1.2;
    /// Airborne background scroll (px/s)
    pub const SKY_SCROLL_SPEED: f32 = 100.0;
}

/// Axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink by `inset` on every side
    #[inline]
    pub fn shrink(&self, inset: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(inset),
            size: self.size - Vec2::splat(inset * 2.0),
        }
    }

    /// Strict overlap test (touching edges do not overlap)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges are not an overlap
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_aabb_shrink() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0).shrink(3.0);
        assert_eq!(a.min, Vec2::new(3.0, 3.0));
        assert_eq!(a.size, Vec2::new(4.0, 4.0));
        assert_eq!(a.center(), Vec2::new(5.0, 5.0));
    }
}
