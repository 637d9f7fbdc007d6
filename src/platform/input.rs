//! Input mapping
//!
//! Two physical buttons drive two logical actions. The difficulty profile
//! may swap which button does what. Holding whichever button maps to jump
//! also counts as holding dive/fly for the bonus modes.

use crate::sim::FrameInput;

/// Physical button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Space, up, W, left half of the screen
    Primary,
    /// Enter, right, down, Z, D, S, right half of the screen
    Secondary,
}

impl Button {
    /// Map a keyboard code (`KeyboardEvent.code` naming)
    pub fn from_key(code: &str) -> Option<Self> {
        match code {
            "Space" | "ArrowUp" | "KeyW" => Some(Button::Primary),
            "Enter" | "ArrowRight" | "KeyZ" | "KeyD" | "ArrowDown" | "KeyS" => {
                Some(Button::Secondary)
            }
            _ => None,
        }
    }

    /// Map a pointer press by which half of the screen it landed on
    pub fn from_pointer(x: f32, screen_width: f32) -> Self {
        if x < screen_width / 2.0 {
            Button::Primary
        } else {
            Button::Secondary
        }
    }
}

/// Logical action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Switch,
}

/// Button state collected between frames
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub swapped: bool,
    jump_held: bool,
    pending: FrameInput,
}

impl Controls {
    pub fn new(swapped: bool) -> Self {
        Self {
            swapped,
            ..Default::default()
        }
    }

    pub fn action_for(&self, button: Button) -> Action {
        match (button, self.swapped) {
            (Button::Primary, false) | (Button::Secondary, true) => Action::Jump,
            (Button::Secondary, false) | (Button::Primary, true) => Action::Switch,
        }
    }

    pub fn press(&mut self, button: Button) -> Action {
        let action = self.action_for(button);
        match action {
            Action::Jump => {
                self.jump_held = true;
                self.pending.jump = true;
            }
            Action::Switch => self.pending.switch = true,
        }
        action
    }

    pub fn release(&mut self, button: Button) {
        if self.action_for(button) == Action::Jump {
            self.jump_held = false;
        }
    }

    /// Pointer up releases everything
    pub fn release_all(&mut self) {
        self.jump_held = false;
    }

    /// Input for the next frame; one-shot actions are consumed
    pub fn take_frame_input(&mut self) -> FrameInput {
        let mut input = std::mem::take(&mut self.pending);
        input.dive_held = self.jump_held;
        input.fly_held = self.jump_held;
        input
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.pending.autopilot = on;
    }
}
