//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as the `dt` passed to `tick`
//! - Seeded RNG only, owned by the run state
//! - No rendering or platform dependencies

pub mod airborne;
pub mod autopilot;
pub mod collision;
pub mod creature;
pub mod player;
pub mod portal;
pub mod state;
pub mod submerged;
pub mod tick;
pub mod track;

pub use collision::{CollisionOutcome, resolve};
pub use creature::{BirdKind, CreatureKind, FishKind, Reward};
pub use player::{PhysicsProfile, Player};
pub use state::{
    DeathCause, GameEvent, GroundColor, Mode, ObstacleKind, RunState, RunStats, RunStatus,
    RunSummary, Viewport,
};
pub use tick::{FrameInput, game_over, jump, revive, switch_color, switch_mode, tick};
pub use track::{GroundSegment, Obstacle, Track};
