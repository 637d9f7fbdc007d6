//! Mode portals
//!
//! Portals only spawn while running on the ground. They drift left slightly
//! faster than the track and switch the active mode when the player touches
//! one.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::within_radius;
use super::state::Mode;
use crate::consts::*;

/// A live portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub pos: Vec2,
    pub radius: f32,
    pub target: Mode,
    /// Visual spin (radians)
    pub rotation: f32,
    /// Visual pulse phase
    pub pulse: f32,
}

impl Portal {
    fn is_retired(&self) -> bool {
        self.pos.x < RETIRE_X
    }
}

/// Spawns, moves and hit-tests portals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSpawner {
    pub portals: Vec<Portal>,
    /// Seconds since the last spawn
    pub timer: f32,
    /// Seconds between the last spawn and the next one
    pub next_spawn: f32,
}

impl Default for PortalSpawner {
    fn default() -> Self {
        Self {
            portals: Vec::new(),
            timer: 0.0,
            next_spawn: PORTAL_FIRST_SPAWN_SECS,
        }
    }
}

impl PortalSpawner {
    /// Advance the spawn timer and move live portals; returns the target
    /// of a newly spawned portal
    pub fn update<R: Rng>(
        &mut self,
        speed: f32,
        view_width: f32,
        ground_y: f32,
        rng: &mut R,
        dt: f32,
    ) -> Option<Mode> {
        let mut spawned = None;
        self.timer += dt;
        if self.timer >= self.next_spawn {
            spawned = self.spawn(view_width, ground_y, rng);
            self.timer = 0.0;
            self.next_spawn = PORTAL_INTERVAL_MIN_SECS + rng.random::<f32>() * PORTAL_INTERVAL_SPREAD_SECS;
        }

        for portal in &mut self.portals {
            portal.pos.x -= speed * PORTAL_SPEED_FACTOR * FRAME_SCALE * dt;
            portal.rotation += PORTAL_SPIN * FRAME_SCALE * dt;
            portal.pulse += dt * PORTAL_PULSE_RATE;
        }
        self.portals.retain(|p| !p.is_retired());
        spawned
    }

    fn spawn<R: Rng>(&mut self, view_width: f32, ground_y: f32, rng: &mut R) -> Option<Mode> {
        if self.portals.len() >= MAX_PORTALS {
            log::debug!("Portal spawn skipped, {} already live", self.portals.len());
            return None;
        }
        let y = ground_y - (rng.random::<f32>() * 80.0 + 70.0);
        let target = if rng.random::<f32>() < PORTAL_AIRBORNE_CHANCE {
            Mode::Airborne
        } else {
            Mode::Submerged
        };
        self.portals.push(Portal {
            pos: Vec2::new(view_width + 100.0, y),
            radius: PORTAL_RADIUS,
            target,
            rotation: 0.0,
            pulse: 0.0,
        });
        log::debug!("Portal spawned: target={target:?} y={y:.0}");
        Some(target)
    }

    /// Remove and return the first portal the player's center touches
    pub fn check_hit(&mut self, player_center: Vec2) -> Option<Mode> {
        let idx = self
            .portals
            .iter()
            .position(|p| within_radius(player_center, p.pos, p.radius + PORTAL_HIT_SLACK))?;
        let portal = self.portals.remove(idx);
        log::info!("Portal hit: target={:?}", portal.target);
        Some(portal.target)
    }

    pub fn clear(&mut self) {
        self.portals.clear();
    }
}
