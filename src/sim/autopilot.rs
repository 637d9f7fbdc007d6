//! Demo controller
//!
//! Produces frame input from the visible state only: jump ahead of
//! obstacles, keep the player's color matched to the ground it is about to
//! stand on, and steer toward rewards while keeping clear of hazards in the
//! bonus modes.

use super::creature::Creature;
use super::state::{Mode, RunState};
use super::tick::FrameInput;
use crate::consts::*;

/// Frames of track travel between leaving the ground and clearing an obstacle
const JUMP_LEAD_FRAMES: f32 = 4.0;
/// Hazards this far ahead (px) are worth dodging
const HAZARD_HORIZON: f32 = 320.0;
/// Vertical clearance (px) kept from a hazard's center
const HAZARD_CLEARANCE: f32 = 90.0;

pub fn drive(state: &RunState, dt: f32) -> FrameInput {
    match state.mode {
        Mode::Ground => drive_ground(state, dt),
        Mode::Submerged => {
            let target = steer_target(state, &state.submerged.fish, &state.submerged.sharks);
            FrameInput {
                dive_held: target > state.player.center().y,
                ..Default::default()
            }
        }
        Mode::Airborne => {
            let target = steer_target(state, &state.airborne.birds, &state.airborne.eagles);
            FrameInput {
                fly_held: target < state.player.center().y,
                ..Default::default()
            }
        }
    }
}

fn drive_ground(state: &RunState, dt: f32) -> FrameInput {
    let player = &state.player;
    let shift = state.speed * FRAME_SCALE * dt;
    let left = player.pos.x;
    let right = left + player.width;

    // The ground the resolver will look at once this frame's scroll lands
    let switch = state
        .track
        .segment_under(left + shift, right + shift)
        .is_some_and(|ground| ground.color != player.color);

    let lead = state.speed * JUMP_LEAD_FRAMES + 10.0;
    let jump = player.grounded
        && state.track.obstacles.iter().any(|obs| {
            let gap = obs.x - right;
            gap > -OBSTACLE_WIDTH && gap <= lead
        });

    FrameInput {
        jump,
        switch,
        ..Default::default()
    }
}

/// Vertical position to steer toward in a bonus mode
fn steer_target(state: &RunState, rewards: &[Creature], hazards: &[Creature]) -> f32 {
    let center = state.player.center();
    let ahead = |c: &&Creature| c.x + c.width > state.player.pos.x && c.x - center.x < HAZARD_HORIZON;

    if let Some(hazard) = hazards
        .iter()
        .filter(ahead)
        .find(|h| (h.y + h.height / 2.0 - center.y).abs() < HAZARD_CLEARANCE)
    {
        let hazard_y = hazard.y + hazard.height / 2.0;
        return if hazard_y >= center.y {
            hazard_y - HAZARD_CLEARANCE * 2.0
        } else {
            hazard_y + HAZARD_CLEARANCE * 2.0
        };
    }

    rewards
        .iter()
        .filter(|c| c.x + c.width > state.player.pos.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|c| c.y + c.height / 2.0)
        .unwrap_or(state.ground_y() / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{GroundColor, ObstacleKind};
    use crate::sim::track::Obstacle;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_jumps_ahead_of_obstacle() {
        let mut state = RunState::new(&Settings::default());
        state.track.obstacles.push(Obstacle {
            x: 150.0,
            kind: ObstacleKind::UraniumFlask,
            passed: false,
        });
        assert!(drive(&state, DT).jump);

        state.track.obstacles[0].x = 900.0;
        assert!(!drive(&state, DT).jump);
    }

    #[test]
    fn test_switches_to_upcoming_ground() {
        let mut state = RunState::new(&Settings::default());
        assert!(!drive(&state, DT).switch);
        state.track.segments[0].color = GroundColor::Dark;
        assert!(drive(&state, DT).switch);
    }

    #[test]
    fn test_bonus_modes_use_hold_flags() {
        let mut state = RunState::new(&Settings::default());
        state.mode = Mode::Submerged;
        let input = drive(&state, DT);
        assert!(!input.jump && !input.switch && !input.fly_held);

        state.mode = Mode::Airborne;
        let input = drive(&state, DT);
        assert!(!input.jump && !input.dive_held);
    }
}
