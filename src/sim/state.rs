//! Run state and core simulation types
//!
//! `RunState` is the single owned aggregate the frame update mutates. It is
//! created at run start and replaced at the start of the next attempt.

use std::collections::VecDeque;
use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::airborne::AirborneMode;
use super::player::Player;
use super::portal::PortalSpawner;
use super::submerged::SubmergedMode;
use super::track::Track;
use crate::consts::*;
use crate::settings::{GroundColorRule, Loadout, Settings, Theme};
use crate::tuning::{Difficulty, DifficultyProfile, DifficultyTable};

/// Active play mode; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Color matching and obstacle avoidance
    #[default]
    Ground,
    /// Timed underwater bonus mode
    Submerged,
    /// Timed flying bonus mode
    Airborne,
}

/// Ground and player color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroundColor {
    #[default]
    Light,
    Dark,
}

impl GroundColor {
    pub fn flipped(self) -> Self {
        match self {
            GroundColor::Light => GroundColor::Dark,
            GroundColor::Dark => GroundColor::Light,
        }
    }
}

impl fmt::Display for GroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroundColor::Light => "Light",
            GroundColor::Dark => "Dark",
        })
    }
}

/// Host drawing area; ground sits a fixed offset above the bottom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Simulation is paused while the device is held upright
    #[inline]
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Grounded on a segment of the other color
    WrongColor { ground: GroundColor },
    /// Touched a track obstacle without a shield
    HazardContact,
    /// Caught by a shark while submerged
    Shark,
    /// Caught by an eagle while airborne
    Eagle,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::WrongColor { ground } => {
                write!(f, "Wrong color! You landed on {ground} ground.")
            }
            DeathCause::HazardContact => f.write_str("Radioactive contact!"),
            DeathCause::Shark => f.write_str("Eaten by a shark!"),
            DeathCause::Eagle => f.write_str("Caught by an eagle!"),
        }
    }
}

/// Whether the run is still being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Running,
    Over(DeathCause),
}

/// Obstacle kinds (tag only, all share one hitbox)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    UraniumFlask,
    CanopicJar,
    PoisonMushroom,
    StormCrystal,
    StoneLantern,
    ToxicBarrel,
    LabTestTubes,
    GlitchBlock,
    NeonPyramid,
    BlackHole,
}

/// End-of-run report for persistence, leaderboard and economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub difficulty: Difficulty,
    /// Truncated final score
    pub final_score: u64,
    pub cause: DeathCause,
    pub obstacles_passed: u32,
    pub max_obstacles_per_second: u32,
    pub color_switches: u32,
    pub max_switches_per_second: u32,
    pub elapsed_secs: f64,
    /// Currency newly earned by this ending (booster applied)
    pub currency_earned: u64,
    pub booster_applied: bool,
    /// A revive has not been used yet this run
    pub revive_available: bool,
}

/// Things that happened during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ColorSwitched { color: GroundColor },
    SpeedUp { speed: f32 },
    ObstaclePassed { total: u32 },
    ShieldConsumed,
    PortalSpawned { target: Mode },
    ModeEntered { mode: Mode },
    ModeExited { mode: Mode },
    RewardCollected { mode: Mode, score: u32, time: f32 },
    CurrencyEarned { amount: u32 },
    Revived,
    RunEnded(RunSummary),
}

/// Counts events inside a rolling one-second window and keeps the peak
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollingRate {
    window: VecDeque<f64>,
    pub max_per_second: u32,
}

impl RollingRate {
    /// Record an event at `now_ms`; returns the current one-second count
    pub fn record(&mut self, now_ms: f64) -> u32 {
        self.window.push_back(now_ms);
        while self.window.front().is_some_and(|&t| now_ms - t > 1000.0) {
            self.window.pop_front();
        }
        let count = self.window.len() as u32;
        self.max_per_second = self.max_per_second.max(count);
        count
    }
}

/// Run-scoped counters consumed by achievement collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub obstacles_passed: u32,
    pub pass_rate: RollingRate,
    pub color_switches: u32,
    pub switch_rate: RollingRate,
    pub revives: u32,
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    /// Profile looked up once at run start
    pub profile: DifficultyProfile,
    pub theme: Theme,
    pub color_rule: GroundColorRule,
    pub loadout: Loadout,
    pub viewport: Viewport,
    pub mode: Mode,
    pub status: RunStatus,
    /// Track speed (px per 1/60 s)
    pub speed: f32,
    pub score: f64,
    /// Simulated frames since run start
    pub frames: u64,
    /// Summed dt since run start (seconds)
    pub elapsed: f64,
    pub player: Player,
    pub track: Track,
    pub portals: PortalSpawner,
    pub submerged: SubmergedMode,
    pub airborne: AirborneMode,
    pub shield_charges: u8,
    pub stats: RunStats,
    pub revived: bool,
    /// Currency already paid out during this run
    pub currency_claimed: u64,
    /// Events emitted since the host last drained them
    pub events: Vec<GameEvent>,
}

impl RunState {
    /// Start a run with the built-in difficulty table
    pub fn new(settings: &Settings) -> Self {
        Self::with_table(settings, &DifficultyTable::default())
    }

    pub fn with_table(settings: &Settings, table: &DifficultyTable) -> Self {
        let profile = *table.get(settings.difficulty);
        let viewport = settings.viewport;
        let loadout = settings.loadout;

        let mut speed = profile.speed_start;
        let mut score = 0.0;
        if loadout.wormhole {
            score = WORMHOLE_START_SCORE;
            speed += WORMHOLE_SPEED_BONUS;
        }

        let mut player = Player::new(viewport.ground_y());
        player.set_physics(profile.gravity, profile.jump_force);

        log::info!(
            "Run starting: difficulty={} seed={} loadout={:?}",
            settings.difficulty,
            settings.seed,
            loadout
        );

        Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            difficulty: settings.difficulty,
            profile,
            theme: settings.theme,
            color_rule: settings.ground_color_rule,
            loadout,
            viewport,
            mode: Mode::Ground,
            status: RunStatus::Running,
            speed,
            score,
            frames: 0,
            elapsed: 0.0,
            player,
            track: Track::new(viewport.width),
            portals: PortalSpawner::default(),
            submerged: SubmergedMode::default(),
            airborne: AirborneMode::default(),
            shield_charges: u8::from(loadout.shield),
            stats: RunStats::default(),
            revived: false,
            currency_claimed: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y()
    }

    /// Score as shown to the player
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Elapsed run time in milliseconds
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }

    /// Adopt a new viewport, keeping the player above the ground
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let max_y = viewport.ground_y() - self.player.height;
        self.player.pos.y = self.player.pos.y.min(max_y);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_keeps_player_above_ground() {
        let mut state = RunState::new(&Settings::default());
        assert_eq!(state.player.bottom(), state.ground_y());

        state.resize(Viewport::new(1280.0, 480.0));
        assert_eq!(state.ground_y(), 380.0);
        assert!(state.player.bottom() <= state.ground_y());

        // Growing the viewport leaves the player where it was
        let y = state.player.pos.y;
        state.resize(Viewport::new(1280.0, 900.0));
        assert_eq!(state.player.pos.y, y);
    }
}
