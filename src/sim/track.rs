//! Procedural track generation
//!
//! Keeps a contiguous ribbon of colored ground segments and a set of
//! obstacles running ahead of the camera. Segment length and obstacle
//! spacing grow with speed, so the minimum gap between obstacles always
//! exceeds what a jump covers at the current speed.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GroundColor, ObstacleKind};
use crate::Aabb;
use crate::consts::*;
use crate::settings::GroundColorRule;

/// A half-open stretch of ground `[x, x + width)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub x: f32,
    pub width: f32,
    pub color: GroundColor,
}

impl GroundSegment {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the open span `(x0, x1)` overlaps this segment
    #[inline]
    pub fn overlaps_span(&self, x0: f32, x1: f32) -> bool {
        x1 > self.x && x0 < self.right()
    }
}

/// A hazard standing on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub kind: ObstacleKind,
    /// Set once the obstacle's right edge has crossed the player
    pub passed: bool,
}

impl Obstacle {
    /// Box anchored to the ground line
    pub fn bounds(&self, ground_y: f32) -> Aabb {
        Aabb::new(
            self.x,
            ground_y - OBSTACLE_HEIGHT,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
        )
    }
}

/// Clearance kept between obstacles and the edges of their segment
#[inline]
pub fn safe_margin(speed: f32) -> f32 {
    (150.0 + speed * 20.0).max(300.0)
}

/// Shortest segment the generator produces at `speed`
#[inline]
pub fn min_segment_length(speed: f32) -> f32 {
    safe_margin(speed) * 2.5 + speed * 10.0
}

/// Horizontal distance a jump covers at `speed`
#[inline]
pub fn jump_distance(speed: f32) -> f32 {
    100.0 + speed * 26.0
}

/// Cursor advance after an obstacle slot; `roll` is in `[0, 200)`
#[inline]
pub fn obstacle_step(speed: f32, gap_multiplier: f32, roll: f32) -> f32 {
    (jump_distance(speed) + roll) * gap_multiplier
}

/// Per-frame inputs for the generator
#[derive(Debug, Clone, Copy)]
pub struct TrackParams {
    pub speed: f32,
    pub gap_multiplier: f32,
    pub view_width: f32,
    /// Left edge of the player box
    pub player_x: f32,
    pub obstacle_kind: ObstacleKind,
    pub color_rule: GroundColorRule,
}

/// Ground ribbon plus obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Ordered by x, contiguous
    pub segments: VecDeque<GroundSegment>,
    pub obstacles: Vec<Obstacle>,
}

impl Track {
    /// One light segment covering one and a half screens
    pub fn new(view_width: f32) -> Self {
        let mut segments = VecDeque::new();
        segments.push_back(GroundSegment {
            x: 0.0,
            width: view_width * 1.5,
            color: GroundColor::Light,
        });
        Self {
            segments,
            obstacles: Vec::new(),
        }
    }

    /// Segment overlapping the open span `(x0, x1)`, oldest first
    pub fn segment_under(&self, x0: f32, x1: f32) -> Option<&GroundSegment> {
        self.segments.iter().find(|g| g.overlaps_span(x0, x1))
    }

    /// Retire, extend and scroll; returns how many obstacles were passed
    pub fn update<R: Rng>(&mut self, params: &TrackParams, rng: &mut R, dt: f32) -> u32 {
        self.retire();
        while self
            .segments
            .back()
            .is_some_and(|g| g.right() < params.view_width + LOOK_AHEAD)
        {
            self.extend(params, rng);
        }

        let shift = params.speed * FRAME_SCALE * dt;
        let mut passed = 0;
        for obs in &mut self.obstacles {
            obs.x -= shift;
            if !obs.passed && obs.x + OBSTACLE_WIDTH < params.player_x {
                obs.passed = true;
                passed += 1;
            }
        }
        self.obstacles.retain(|o| o.x >= RETIRE_X);

        self.scroll(shift);
        passed
    }

    /// Drop ground that is fully behind the camera
    fn retire(&mut self) {
        while self.segments.len() > 1
            && self.segments.front().is_some_and(|g| g.right() < RETIRE_X)
        {
            self.segments.pop_front();
        }
    }

    /// Move the ribbon left, re-chaining so segments stay exactly contiguous
    fn scroll(&mut self, shift: f32) {
        let mut edge = None;
        for g in &mut self.segments {
            g.x = match edge {
                None => g.x - shift,
                Some(right) => right,
            };
            edge = Some(g.right());
        }
    }

    /// Append one segment after the last and populate its obstacles
    pub fn extend<R: Rng>(&mut self, params: &TrackParams, rng: &mut R) {
        let Some(last) = self.segments.back().copied() else {
            return;
        };
        let start = last.right();

        let flip_roll: f32 = rng.random();
        let color = match params.color_rule {
            GroundColorRule::AlwaysFlip => last.color.flipped(),
            GroundColorRule::FlipWithChance { chance } if flip_roll < chance => {
                last.color.flipped()
            }
            GroundColorRule::FlipWithChance { .. } => last.color,
        };

        let speed = params.speed;
        let margin = safe_margin(speed);
        let length = min_segment_length(speed) + rng.random::<f32>() * 500.0;
        self.segments.push_back(GroundSegment {
            x: start,
            width: length,
            color,
        });

        let limit = start + length - margin;
        let mut cursor = start + margin;
        let mut placed = 0;
        while cursor < limit {
            if rng.random::<f32>() < OBSTACLE_FILL_CHANCE {
                self.obstacles.push(Obstacle {
                    x: cursor,
                    kind: params.obstacle_kind,
                    passed: false,
                });
                placed += 1;
            }
            cursor += obstacle_step(speed, params.gap_multiplier, rng.random::<f32>() * 200.0);
        }
        log::debug!(
            "Ground segment at {start:.0} len={length:.0} color={color} obstacles={placed}"
        );
    }
}
