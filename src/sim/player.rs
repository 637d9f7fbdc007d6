//! Player physics
//!
//! Vertical motion under one of three mutually exclusive profiles. Each
//! profile is a pure transition over a `Body`; the `Player` owns the body
//! plus color and invulnerability.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GroundColor, Mode};
use crate::Aabb;
use crate::consts::*;

/// Submerged: dive acceleration and its clamp
const DIVE_ACCEL: f32 = 1.5;
const DIVE_MAX_VY: f32 = 8.0;
/// Submerged: upward drift and its clamp
const DRIFT_ACCEL: f32 = 0.8;
const DRIFT_MIN_VY: f32 = -6.0;
const WATER_DAMPING: f32 = 0.96;

/// Airborne: lift while flying and its clamp
const LIFT_ACCEL: f32 = 1.2;
const LIFT_MIN_VY: f32 = -9.0;
/// Airborne: slow fall and its clamp
const FALL_ACCEL: f32 = 0.5;
const FALL_MAX_VY: f32 = 6.0;
const AIR_DAMPING: f32 = 0.94;

/// Active physics profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhysicsProfile {
    #[default]
    Ground,
    Submerged,
    Airborne,
}

impl From<Mode> for PhysicsProfile {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Ground => PhysicsProfile::Ground,
            Mode::Submerged => PhysicsProfile::Submerged,
            Mode::Airborne => PhysicsProfile::Airborne,
        }
    }
}

/// Vertical state integrated by a profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub y: f32,
    pub vy: f32,
    pub grounded: bool,
}

/// Inputs a profile step needs besides the body
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub dt: f32,
    pub ground_y: f32,
    pub height: f32,
    pub gravity: f32,
    /// Dive (submerged) or fly (airborne) is held
    pub hold: bool,
}

impl PhysicsProfile {
    /// Advance `body` by one frame
    pub fn step(self, body: Body, p: &StepParams) -> Body {
        match self {
            PhysicsProfile::Ground => step_ground(body, p),
            PhysicsProfile::Submerged => step_submerged(body, p),
            PhysicsProfile::Airborne => step_airborne(body, p),
        }
    }
}

fn step_ground(mut b: Body, p: &StepParams) -> Body {
    b.vy += p.gravity * FRAME_SCALE * p.dt;
    b.y += b.vy * FRAME_SCALE * p.dt;

    if b.y + p.height >= p.ground_y {
        b.y = p.ground_y - p.height;
        b.vy = 0.0;
        b.grounded = true;
    } else {
        b.grounded = false;
    }
    b
}

fn step_submerged(mut b: Body, p: &StepParams) -> Body {
    if p.hold {
        b.vy = (b.vy + DIVE_ACCEL * FRAME_SCALE * p.dt).min(DIVE_MAX_VY);
    } else {
        b.vy = (b.vy - DRIFT_ACCEL * FRAME_SCALE * p.dt).max(DRIFT_MIN_VY);
    }
    b.vy *= WATER_DAMPING;
    b.y += b.vy * FRAME_SCALE * p.dt;

    // Clamp position only; water keeps its momentum
    b.y = b.y.max(0.0);
    if b.y + p.height > p.ground_y {
        b.y = p.ground_y - p.height;
    }
    b
}

fn step_airborne(mut b: Body, p: &StepParams) -> Body {
    if p.hold {
        b.vy = (b.vy - LIFT_ACCEL * FRAME_SCALE * p.dt).max(LIFT_MIN_VY);
    } else {
        b.vy = (b.vy + FALL_ACCEL * FRAME_SCALE * p.dt).min(FALL_MAX_VY);
    }
    b.vy *= AIR_DAMPING;
    b.y += b.vy * FRAME_SCALE * p.dt;

    if b.y < 0.0 {
        b.y = 0.0;
        b.vy = 0.0;
    }
    if b.y + p.height > p.ground_y {
        b.y = p.ground_y - p.height;
        b.vy = 0.0;
    }
    b
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x stays in the fixed lane
    pub pos: Vec2,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub color: GroundColor,
    pub grounded: bool,
    /// Remaining invulnerability (ms)
    pub invulnerable_ms: f32,
    pub profile: PhysicsProfile,
    pub gravity: f32,
    pub jump_force: f32,
    /// Run time (s) of the last color switch
    pub last_switch_time: Option<f64>,
    /// Color held when the current jump started
    pub jump_color: Option<GroundColor>,
}

impl Player {
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y - PLAYER_HEIGHT),
            vy: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            color: GroundColor::Light,
            grounded: true,
            invulnerable_ms: 0.0,
            profile: PhysicsProfile::Ground,
            gravity: 1.8,
            jump_force: -22.0,
            last_switch_time: None,
            jump_color: None,
        }
    }

    pub fn set_physics(&mut self, gravity: f32, jump_force: f32) {
        self.gravity = gravity;
        self.jump_force = jump_force;
    }

    /// Switch physics profile; the bonus profiles start at rest and airborne
    pub fn set_profile(&mut self, profile: PhysicsProfile) {
        self.profile = profile;
        if profile != PhysicsProfile::Ground {
            self.vy = 0.0;
            self.grounded = false;
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Start (or extend to) an invulnerability window
    pub fn grant_invulnerability(&mut self, ms: f32) {
        self.invulnerable_ms = ms;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Advance invulnerability and vertical motion by `dt` seconds
    pub fn update(&mut self, ground_y: f32, hold: bool, dt: f32) {
        if self.is_invulnerable() {
            self.invulnerable_ms = (self.invulnerable_ms - dt * 1000.0).max(0.0);
        }

        let params = StepParams {
            dt,
            ground_y,
            height: self.height,
            gravity: self.gravity,
            hold,
        };
        let body = self.profile.step(
            Body {
                y: self.pos.y,
                vy: self.vy,
                grounded: self.grounded,
            },
            &params,
        );
        self.pos.y = body.y;
        self.vy = body.vy;
        self.grounded = body.grounded;
    }

    /// Jump if standing on the ground; reports whether it happened
    pub fn jump(&mut self) -> bool {
        if self.profile != PhysicsProfile::Ground || !self.grounded {
            return false;
        }
        self.vy = self.jump_force;
        self.grounded = false;
        self.jump_color = Some(self.color);
        true
    }

    pub fn switch_color(&mut self, now: f64) {
        self.color = self.color.flipped();
        self.last_switch_time = Some(now);
    }
}
