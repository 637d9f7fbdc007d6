//! Platform abstraction layer
//!
//! Host-facing pieces that sit between the browser/native shell and the
//! simulation:
//! - Frame pacing (`clock`)
//! - Input mapping (`input`)

pub mod clock;
pub mod input;

pub use clock::{FrameClock, FrameDecision};
pub use input::{Action, Button, Controls};
