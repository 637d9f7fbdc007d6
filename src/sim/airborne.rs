//! Airborne bonus mode
//!
//! Same shape as the submerged mode with its own table: birds can also pay
//! out currency, eagles are the hazard, and collected rewards leave a short
//! floating label behind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::creature::{BonusFrame, Creature, ModeStep, SpawnKind, scroll_backdrop, spawn_gate};
use super::state::{DeathCause, GameEvent, Mode};
use crate::consts::*;

const PLAYER_EAGLE_INSET: f32 = 4.0;
const EAGLE_INSET: f32 = 6.0;
/// Floating label rise (px/s) and fade (life/s)
const LABEL_RISE: f32 = 20.0;
const LABEL_FADE: f32 = 1.5;

/// Reward feedback label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    /// 1.0 when spawned, gone at 0
    pub life: f32,
    pub currency: bool,
}

impl FloatingText {
    fn new(x: f32, y: f32, text: String, currency: bool) -> Self {
        Self {
            pos: Vec2::new(x, y),
            text,
            life: 1.0,
            currency,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirborneMode {
    pub timer: f32,
    pub birds: Vec<Creature>,
    pub eagles: Vec<Creature>,
    pub bird_timer: f32,
    pub eagle_timer: f32,
    pub labels: Vec<FloatingText>,
    pub backdrop_x: f32,
}

impl AirborneMode {
    pub fn enter<R: Rng>(&mut self, view_width: f32, ground_y: f32, rng: &mut R) {
        self.timer = AIRBORNE_DURATION;
        self.birds.clear();
        self.eagles.clear();
        self.labels.clear();
        self.bird_timer = 0.0;
        self.eagle_timer = 0.0;
        self.backdrop_x = 0.0;
        for i in 0..2 {
            let x = view_width + 100.0 + i as f32 * 200.0;
            self.birds.push(Creature::spawn(SpawnKind::Bird, x, ground_y, rng));
        }
        log::info!("Entering airborne mode");
    }

    pub fn clear(&mut self) {
        self.birds.clear();
        self.eagles.clear();
        self.labels.clear();
    }

    pub fn update<R: Rng>(&mut self, f: &mut BonusFrame<'_, R>) -> ModeStep {
        self.timer -= f.dt;
        if self.timer <= 0.0 {
            return ModeStep::Expired;
        }

        *f.score += AIRBORNE_SCORE_RATE * f.score_multiplier;
        self.backdrop_x = scroll_backdrop(self.backdrop_x, SKY_SCROLL_SPEED, f.view_width, f.dt);

        if spawn_gate(&mut self.bird_timer, f.dt, 1.0, 2.0, 1.0, f.rng) {
            self.birds
                .push(Creature::spawn(SpawnKind::Bird, f.view_width + 50.0, f.ground_y, f.rng));
        }
        self.update_birds(f);

        if spawn_gate(&mut self.eagle_timer, f.dt, 2.0, 3.0, 0.45, f.rng) {
            self.eagles
                .push(Creature::spawn(SpawnKind::Eagle, f.view_width + 100.0, f.ground_y, f.rng));
            log::debug!("Eagle spawned");
        }

        let body = f.player.bounds().shrink(PLAYER_EAGLE_INSET);
        let invulnerable = f.player.is_invulnerable();
        for eagle in &mut self.eagles {
            eagle.update(f.dt);
            if !invulnerable && body.overlaps(&eagle.bounds().shrink(EAGLE_INSET)) {
                return ModeStep::Fatal(DeathCause::Eagle);
            }
        }
        self.eagles.retain(|e| !e.is_retired());

        for label in &mut self.labels {
            label.pos.y -= LABEL_RISE * f.dt;
            label.life -= LABEL_FADE * f.dt;
        }
        self.labels.retain(|l| l.life > 0.0);

        ModeStep::Continue
    }

    fn update_birds<R: Rng>(&mut self, f: &mut BonusFrame<'_, R>) {
        let body = f.player.bounds();
        let mut i = 0;
        while i < self.birds.len() {
            let bird = &mut self.birds[i];
            bird.update(f.dt);
            if !body.overlaps(&bird.bounds()) {
                if bird.is_retired() {
                    self.birds.remove(i);
                } else {
                    i += 1;
                }
                continue;
            }

            let bird = self.birds.remove(i);
            let Some(reward) = bird.kind.reward() else {
                continue;
            };
            if reward.time > 0.0 {
                self.timer += reward.time;
            }
            if reward.score > 0 {
                *f.score += f64::from(reward.score);
                self.labels
                    .push(FloatingText::new(bird.x, bird.y, format!("+{}", reward.score), false));
            }
            if reward.currency > 0 {
                *f.currency_claimed += u64::from(reward.currency);
                self.labels.push(FloatingText::new(
                    bird.x,
                    bird.y - 20.0,
                    format!("+{} ATOM", reward.currency),
                    true,
                ));
                f.events.push(GameEvent::CurrencyEarned {
                    amount: reward.currency,
                });
            }
            f.events.push(GameEvent::RewardCollected {
                mode: Mode::Airborne,
                score: reward.score,
                time: reward.time,
            });
        }
    }
}
