//! Run configuration
//!
//! Everything chosen before a run starts: difficulty, viewport, loadout,
//! theme and seed. Stored as JSON by the host.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ObstacleKind;
use crate::sim::state::Viewport;
use crate::tuning::Difficulty;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty id '{0}'")]
    UnknownDifficulty(String),
    #[error("invalid tuning for {0}")]
    InvalidProfile(Difficulty),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Visual theme; only decides which obstacle kind the track places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Theme {
    #[default]
    City,
    Lab,
    Matrix,
    Synthwave,
    Void,
    Egypt,
    Forest,
    Island,
    Oriental,
    Ruins,
}

impl Theme {
    pub fn obstacle_kind(&self) -> ObstacleKind {
        match self {
            Theme::City => ObstacleKind::UraniumFlask,
            Theme::Lab => ObstacleKind::LabTestTubes,
            Theme::Matrix => ObstacleKind::GlitchBlock,
            Theme::Synthwave => ObstacleKind::NeonPyramid,
            Theme::Void => ObstacleKind::BlackHole,
            Theme::Egypt => ObstacleKind::CanopicJar,
            Theme::Forest => ObstacleKind::PoisonMushroom,
            Theme::Island => ObstacleKind::StormCrystal,
            Theme::Oriental => ObstacleKind::StoneLantern,
            Theme::Ruins => ObstacleKind::ToxicBarrel,
        }
    }
}

/// Consumables activated at run start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadout {
    /// One shield charge for the run
    pub shield: bool,
    /// Start with bonus score and speed
    pub wormhole: bool,
    /// Double end-of-run currency
    pub booster: bool,
}

/// How a freshly generated ground segment picks its color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum GroundColorRule {
    /// Every new segment takes the opposite color of its predecessor
    #[default]
    AlwaysFlip,
    /// Flip with the given probability, otherwise repeat the color
    FlipWithChance { chance: f32 },
}

/// Tuned flip probability for `GroundColorRule::FlipWithChance`
pub const GROUND_FLIP_CHANCE: f32 = 0.85;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub viewport: Viewport,
    #[serde(default)]
    pub loadout: Loadout,
    #[serde(default)]
    pub theme: Theme,
    /// Run seed for reproducibility
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub ground_color_rule: GroundColorRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            viewport: Viewport::default(),
            loadout: Loadout::default(),
            theme: Theme::default(),
            seed: 0,
            ground_color_rule: GroundColorRule::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
