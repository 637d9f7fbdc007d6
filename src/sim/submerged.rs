//! Submerged bonus mode
//!
//! A ten second swim. Fish grant score or extra time; sharks end the run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::creature::{BonusFrame, Creature, ModeStep, SpawnKind, scroll_backdrop, spawn_gate};
use super::state::{DeathCause, GameEvent, Mode};
use crate::consts::*;

const SEA_SCROLL_SPEED: f32 = 80.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmergedMode {
    /// Seconds left before surfacing
    pub timer: f32,
    pub fish: Vec<Creature>,
    pub sharks: Vec<Creature>,
    pub fish_timer: f32,
    pub shark_timer: f32,
    pub backdrop_x: f32,
}

impl SubmergedMode {
    pub fn enter<R: Rng>(&mut self, view_width: f32, ground_y: f32, rng: &mut R) {
        self.timer = SUBMERGED_DURATION;
        self.backdrop_x = 0.0;
        self.fish.clear();
        let count = if rng.random::<f32>() < 0.5 { 1 } else { 2 };
        for i in 0..count {
            let x = view_width / 2.0 + 100.0 + i as f32 * 150.0;
            self.fish.push(Creature::spawn(SpawnKind::Fish, x, ground_y, rng));
        }
        self.sharks.clear();
        self.fish_timer = 0.0;
        self.shark_timer = 0.0;
        log::info!("Entering submerged mode with {count} fish");
    }

    /// Drop every transient entity
    pub fn clear(&mut self) {
        self.fish.clear();
        self.sharks.clear();
    }

    pub fn update<R: Rng>(&mut self, f: &mut BonusFrame<'_, R>) -> ModeStep {
        self.timer -= f.dt;
        if self.timer <= 0.0 {
            return ModeStep::Expired;
        }

        *f.score += SUBMERGED_SCORE_RATE * f.score_multiplier;
        self.backdrop_x = scroll_backdrop(self.backdrop_x, SEA_SCROLL_SPEED, f.view_width, f.dt);

        if spawn_gate(&mut self.fish_timer, f.dt, 1.5, 2.0, 0.8, f.rng) {
            let fish = Creature::spawn(SpawnKind::Fish, f.view_width + 50.0, f.ground_y, f.rng);
            log::debug!("Fish spawned: {:?}", fish.kind);
            self.fish.push(fish);
        }

        let body = f.player.bounds();
        let mut collected = Vec::new();
        self.fish.retain_mut(|fish| {
            fish.update(f.dt);
            if body.overlaps(&fish.bounds()) {
                if let Some(reward) = fish.kind.reward() {
                    collected.push(reward);
                }
                return false;
            }
            !fish.is_retired()
        });
        for reward in collected {
            if reward.time > 0.0 {
                self.timer += reward.time;
            }
            *f.score += f64::from(reward.score);
            f.events.push(GameEvent::RewardCollected {
                mode: Mode::Submerged,
                score: reward.score,
                time: reward.time,
            });
        }

        if spawn_gate(&mut self.shark_timer, f.dt, 2.0, 2.0, 0.4, f.rng) {
            self.sharks
                .push(Creature::spawn(SpawnKind::Shark, f.view_width + 80.0, f.ground_y, f.rng));
            log::debug!("Shark spawned");
        }

        let invulnerable = f.player.is_invulnerable();
        for shark in &mut self.sharks {
            shark.update(f.dt);
            if !invulnerable && body.overlaps(&shark.bounds()) {
                return ModeStep::Fatal(DeathCause::Shark);
            }
        }
        self.sharks.retain(|s| !s.is_retired());

        ModeStep::Continue
    }
}
