//! Difficulty/progression table
//!
//! Immutable per-difficulty tuning looked up once at run start and passed
//! down to every component. Unknown ids fall back to the default profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Difficulty ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Extreme => "EXTREME",
        }
    }

    /// Parse an id, falling back to the default difficulty
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log::warn!("{err}; using {}", Difficulty::default());
            Difficulty::default()
        })
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "NORMAL" => Ok(Difficulty::Normal),
            "HARD" => Ok(Difficulty::Hard),
            "EXTREME" => Ok(Difficulty::Extreme),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Track speed at run start (px per 1/60 s)
    pub speed_start: f32,
    /// Speed never exceeds this
    pub speed_max: f32,
    /// Speed steps up on frames that are a multiple of this
    pub accel_interval: u64,
    /// Per-frame score accrual multiplier
    pub score_multiplier: f64,
    /// Ground-profile gravity (per 1/60 s)
    pub gravity: f32,
    /// Upward impulse applied by a jump (negative is up)
    pub jump_force: f32,
    /// Larger multiplier spaces obstacles further apart
    pub gap_multiplier: f32,
    /// Swap the jump and switch controls
    #[serde(default)]
    pub swap_controls: bool,
}

impl DifficultyProfile {
    pub const EASY: Self = Self {
        speed_start: 7.0,
        speed_max: 14.0,
        accel_interval: 800,
        score_multiplier: 1.0,
        gravity: 1.5,
        jump_force: -20.0,
        gap_multiplier: 1.5,
        swap_controls: false,
    };

    pub const NORMAL: Self = Self {
        speed_start: 9.0,
        speed_max: 22.0,
        accel_interval: 600,
        score_multiplier: 1.5,
        gravity: 1.65,
        jump_force: -21.0,
        gap_multiplier: 1.2,
        swap_controls: false,
    };

    pub const HARD: Self = Self {
        speed_start: 11.0,
        speed_max: 30.0,
        accel_interval: 400,
        score_multiplier: 2.0,
        gravity: 1.8,
        jump_force: -22.0,
        gap_multiplier: 1.0,
        swap_controls: false,
    };

    pub const EXTREME: Self = Self {
        speed_start: 13.0,
        speed_max: 35.0,
        accel_interval: 300,
        score_multiplier: 3.0,
        gravity: 2.0,
        jump_force: -24.0,
        gap_multiplier: 0.9,
        swap_controls: true,
    };

    /// Speed after advancing to `frame`
    ///
    /// Steps by a fixed increment only when `frame` is a multiple of the
    /// acceleration interval, clamped at the ceiling.
    pub fn next_speed(&self, speed: f32, frame: u64) -> f32 {
        if self.accel_interval > 0
            && frame.is_multiple_of(self.accel_interval)
            && speed < self.speed_max
        {
            (speed + crate::consts::SPEED_INCREMENT).min(self.speed_max)
        } else {
            speed
        }
    }
}

/// Lookup from difficulty to profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
    pub extreme: DifficultyProfile,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::EASY,
            normal: DifficultyProfile::NORMAL,
            hard: DifficultyProfile::HARD,
            extreme: DifficultyProfile::EXTREME,
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
            Difficulty::Extreme => &self.extreme,
        }
    }

    /// Look up by raw id; unrecognized ids resolve to the default profile
    pub fn profile(&self, id: &str) -> &DifficultyProfile {
        self.get(Difficulty::parse_or_default(id))
    }

    /// Parse a table override from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        for difficulty in Difficulty::ALL {
            let p = table.get(difficulty);
            if p.accel_interval == 0 || p.speed_start > p.speed_max {
                return Err(ConfigError::InvalidProfile(difficulty));
            }
        }
        Ok(table)
    }
}
