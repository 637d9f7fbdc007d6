//! Reward and hazard creatures of the bonus modes
//!
//! Fish and sharks swim through the submerged mode, birds and eagles fly
//! through the airborne mode. Reward creatures carry a payload chosen by
//! cumulative weight from a fixed table; hazards are fatal on contact.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::state::{DeathCause, GameEvent};
use crate::Aabb;

/// Payload granted when a reward creature is collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub score: u32,
    /// Seconds added to the mode timer
    pub time: f32,
    pub currency: u32,
}

/// Fish variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishKind {
    /// Time bonus
    Green,
    /// Score bonus
    Blue,
    Gold,
    /// Rare score
    Purple,
    /// Rare time
    Orange,
}

/// Bird variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BirdKind {
    Green,
    Blue,
    Gold,
    Purple,
    Orange,
}

/// (kind, score, time, currency, weight)
pub const FISH_TABLE: [(FishKind, u32, f32, u32, f32); 5] = [
    (FishKind::Green, 0, 1.0, 0, 0.4),
    (FishKind::Blue, 10, 0.0, 0, 0.3),
    (FishKind::Gold, 50, 0.0, 0, 0.1),
    (FishKind::Purple, 25, 0.0, 0, 0.15),
    (FishKind::Orange, 0, 2.0, 0, 0.05),
];

/// (kind, score, time, currency, weight)
pub const BIRD_TABLE: [(BirdKind, u32, f32, u32, f32); 5] = [
    (BirdKind::Green, 20, 1.0, 0, 0.4),
    (BirdKind::Blue, 30, 0.0, 0, 0.3),
    (BirdKind::Gold, 100, 0.0, 5, 0.1),
    (BirdKind::Purple, 50, 0.0, 2, 0.15),
    (BirdKind::Orange, 40, 2.0, 1, 0.05),
];

/// Pick a row by cumulative weight; rolls past the total land on the last row
pub fn pick_weighted<K: Copy, const N: usize>(
    table: &[(K, u32, f32, u32, f32); N],
    roll: f32,
) -> (K, Reward) {
    const { assert!(N > 0) };
    let mut cumulative = 0.0;
    let mut picked = table[N - 1];
    for &row in table {
        cumulative += row.4;
        if roll < cumulative {
            picked = row;
            break;
        }
    }
    let (kind, score, time, currency, _) = picked;
    (kind, Reward { score, time, currency })
}

impl FishKind {
    pub fn reward(self) -> Reward {
        let row = FISH_TABLE.iter().find(|row| row.0 == self).unwrap_or(&FISH_TABLE[0]);
        Reward { score: row.1, time: row.2, currency: row.3 }
    }
}

impl BirdKind {
    pub fn reward(self) -> Reward {
        let row = BIRD_TABLE.iter().find(|row| row.0 == self).unwrap_or(&BIRD_TABLE[0]);
        Reward { score: row.1, time: row.2, currency: row.3 }
    }
}

/// Creature kinds across both bonus modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureKind {
    Fish(FishKind),
    Shark,
    Bird(BirdKind),
    Eagle,
}

impl CreatureKind {
    /// Reward payload, `None` for hazards
    pub fn reward(&self) -> Option<Reward> {
        match self {
            CreatureKind::Fish(kind) => Some(kind.reward()),
            CreatureKind::Bird(kind) => Some(kind.reward()),
            CreatureKind::Shark | CreatureKind::Eagle => None,
        }
    }

    pub fn is_hazard(&self) -> bool {
        self.reward().is_none()
    }

    /// Base box before the per-creature scale
    fn base_size(&self) -> (f32, f32) {
        match self {
            CreatureKind::Fish(_) => (30.0, 20.0),
            CreatureKind::Shark => (70.0, 35.0),
            CreatureKind::Bird(_) => (35.0, 25.0),
            CreatureKind::Eagle => (80.0, 40.0),
        }
    }

    /// (phase rate, phase multiplier, amplitude) of the vertical wave
    fn wave(&self) -> (f32, f32, f32) {
        match self {
            CreatureKind::Fish(_) => (1.0, 2.0, 20.0),
            CreatureKind::Shark => (1.0, 1.5, 15.0),
            CreatureKind::Bird(_) => (10.0, 0.5, 25.0),
            CreatureKind::Eagle => (8.0, 0.3, 20.0),
        }
    }

    /// Creatures further left than this are gone
    pub fn retire_x(&self) -> f32 {
        match self {
            CreatureKind::Fish(_) | CreatureKind::Bird(_) => -100.0,
            CreatureKind::Shark => -150.0,
            CreatureKind::Eagle => -200.0,
        }
    }
}

/// A swimming or flying creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub kind: CreatureKind,
    pub x: f32,
    pub y: f32,
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    /// Leftward speed (px/s)
    pub speed: f32,
    pub phase_offset: f32,
    pub wave_timer: f32,
}

impl Creature {
    /// Spawn at `x` with randomized height, speed, scale and payload
    pub fn spawn<R: Rng>(kind: SpawnKind, x: f32, ground_y: f32, rng: &mut R) -> Self {
        // Draw order mirrors the field order: height, speed, offset, scale, kind
        let (kind, y, speed, phase_offset, scale) = match kind {
            SpawnKind::Fish => {
                let y = rng.random::<f32>() * (ground_y - 100.0) + 50.0;
                let speed = rng.random::<f32>() * 130.0 + 120.0;
                let offset = rng.random::<f32>() * 100.0;
                let scale = 0.8 + rng.random::<f32>() * 0.4;
                let (fish, _) = pick_weighted(&FISH_TABLE, rng.random());
                (CreatureKind::Fish(fish), y, speed, offset, scale)
            }
            SpawnKind::Shark => {
                let y = rng.random::<f32>() * (ground_y - 150.0) + 80.0;
                let speed = rng.random::<f32>() * 150.0 + 250.0;
                let offset = rng.random::<f32>() * 100.0;
                let scale = 1.0 + rng.random::<f32>() * 0.3;
                (CreatureKind::Shark, y, speed, offset, scale)
            }
            SpawnKind::Bird => {
                let y = rng.random::<f32>() * (ground_y - 150.0) + 50.0;
                let speed = rng.random::<f32>() * 100.0 + 150.0;
                let offset = rng.random::<f32>() * 100.0;
                let scale = 0.8 + rng.random::<f32>() * 0.4;
                let (bird, _) = pick_weighted(&BIRD_TABLE, rng.random());
                (CreatureKind::Bird(bird), y, speed, offset, scale)
            }
            SpawnKind::Eagle => {
                let y = rng.random::<f32>() * (ground_y - 200.0) + 100.0;
                let speed = rng.random::<f32>() * 150.0 + 300.0;
                let offset = rng.random::<f32>() * 100.0;
                let scale = 1.1 + rng.random::<f32>() * 0.3;
                (CreatureKind::Eagle, y, speed, offset, scale)
            }
        };
        let (w, h) = kind.base_size();
        Self {
            kind,
            x,
            y,
            base_y: y,
            width: w * scale,
            height: h * scale,
            speed,
            phase_offset,
            wave_timer: 0.0,
        }
    }

    /// Swim/fly left and bob around the spawn height
    pub fn update(&mut self, dt: f32) {
        let (rate, mult, amplitude) = self.kind.wave();
        self.x -= self.speed * dt;
        self.wave_timer += dt * rate;
        self.y = self.base_y + (self.wave_timer * mult + self.phase_offset).sin() * amplitude;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_retired(&self) -> bool {
        self.x < self.kind.retire_x()
    }
}

/// What to spawn; the concrete variant is rolled at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Fish,
    Shark,
    Bird,
    Eagle,
}

/// Borrowed slice of the run handed to a bonus mode for one frame
pub struct BonusFrame<'a, R: Rng> {
    pub player: &'a Player,
    pub rng: &'a mut R,
    pub view_width: f32,
    pub ground_y: f32,
    pub score_multiplier: f64,
    pub score: &'a mut f64,
    pub currency_claimed: &'a mut u64,
    pub events: &'a mut Vec<GameEvent>,
    pub dt: f32,
}

/// What a bonus mode frame asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStep {
    Continue,
    /// Timer ran out; return to the ground
    Expired,
    Fatal(DeathCause),
}

/// Per-frame spawn gate: the threshold is redrawn every frame and the timer
/// resets whenever it is crossed, spawn or not
pub(crate) fn spawn_gate<R: Rng>(
    timer: &mut f32,
    dt: f32,
    base: f32,
    spread: f32,
    chance: f32,
    rng: &mut R,
) -> bool {
    *timer += dt;
    if *timer <= rng.random::<f32>() * spread + base {
        return false;
    }
    *timer = 0.0;
    chance >= 1.0 || rng.random::<f32>() < chance
}

/// Scroll a looping backdrop leftward, wrapping after one screen width
pub(crate) fn scroll_backdrop(x: f32, speed: f32, view_width: f32, dt: f32) -> f32 {
    let x = x - speed * dt;
    if x <= -view_width { 0.0 } else { x }
}
