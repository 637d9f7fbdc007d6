//! Per-frame simulation update
//!
//! One call advances the run by `dt` seconds in whichever mode is active.
//! The mode state machine lives here too: portals move the run off the
//! ground, bonus timers bring it back, fatal outcomes end it.

use super::autopilot;
use super::collision::{self, CollisionOutcome};
use super::creature::{BonusFrame, ModeStep};
use super::player::PhysicsProfile;
use super::state::{DeathCause, GameEvent, Mode, RunState, RunStatus, RunSummary};
use super::track::TrackParams;
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Jump action (edge)
    pub jump: bool,
    /// Color switch action (edge)
    pub switch: bool,
    /// Dive is held (submerged)
    pub dive_held: bool,
    /// Fly is held (airborne)
    pub fly_held: bool,
    /// Demo mode - the autopilot plays
    pub autopilot: bool,
}

/// Advance the run by one frame
pub fn tick(state: &mut RunState, input: &FrameInput, dt: f32) {
    if !state.is_running() {
        return;
    }

    let input = if input.autopilot {
        autopilot::drive(state, dt)
    } else {
        *input
    };
    if input.jump {
        jump(state);
    }
    if input.switch {
        switch_color(state);
    }

    state.frames += 1;
    state.elapsed += f64::from(dt);

    match state.mode {
        Mode::Ground => tick_ground(state, dt),
        Mode::Submerged => tick_bonus(state, input.dive_held, dt),
        Mode::Airborne => tick_bonus(state, input.fly_held, dt),
    }
}

/// Jump action; false when the player cannot jump right now
pub fn jump(state: &mut RunState) -> bool {
    if !state.is_running() || !state.player.jump() {
        return false;
    }
    state.events.push(GameEvent::Jumped);
    true
}

/// Color switch action
pub fn switch_color(state: &mut RunState) -> bool {
    if !state.is_running() {
        return false;
    }
    let now = state.elapsed;
    state.player.switch_color(now);
    state.stats.color_switches += 1;
    state.stats.switch_rate.record(state.now_ms());
    state.events.push(GameEvent::ColorSwitched {
        color: state.player.color,
    });
    true
}

fn tick_ground(state: &mut RunState, dt: f32) {
    let ground_y = state.ground_y();
    let view_width = state.viewport.width;

    if let Some(target) = state
        .portals
        .update(state.speed, view_width, ground_y, &mut state.rng, dt)
    {
        state.events.push(GameEvent::PortalSpawned { target });
    }
    if let Some(target) = state.portals.check_hit(state.player.center()) {
        state.portals.clear();
        switch_mode(state, target);
        return;
    }

    let speed = state.profile.next_speed(state.speed, state.frames);
    if speed > state.speed {
        state.speed = speed;
        log::debug!("Speed up to {speed} at frame {}", state.frames);
        state.events.push(GameEvent::SpeedUp { speed });
    }
    state.score += state.profile.score_multiplier;

    state.player.update(ground_y, false, dt);

    let params = TrackParams {
        speed: state.speed,
        gap_multiplier: state.profile.gap_multiplier,
        view_width,
        player_x: state.player.pos.x,
        obstacle_kind: state.theme.obstacle_kind(),
        color_rule: state.color_rule,
    };
    let passed = state.track.update(&params, &mut state.rng, dt);
    let now_ms = state.now_ms();
    for _ in 0..passed {
        state.stats.obstacles_passed += 1;
        state.stats.pass_rate.record(now_ms);
        state.events.push(GameEvent::ObstaclePassed {
            total: state.stats.obstacles_passed,
        });
    }

    let charges = state.shield_charges;
    let outcome = collision::resolve(
        &mut state.player,
        &state.track,
        ground_y,
        &mut state.shield_charges,
    );
    for _ in state.shield_charges..charges {
        state.events.push(GameEvent::ShieldConsumed);
    }
    if let CollisionOutcome::Fatal(cause) = outcome {
        game_over(state, cause);
    }
}

fn tick_bonus(state: &mut RunState, hold: bool, dt: f32) {
    let mode = state.mode;
    let ground_y = state.ground_y();

    let RunState {
        rng,
        viewport,
        profile,
        score,
        player,
        submerged,
        airborne,
        currency_claimed,
        events,
        ..
    } = state;
    let mut frame = BonusFrame {
        player: &*player,
        rng,
        view_width: viewport.width,
        ground_y,
        score_multiplier: profile.score_multiplier,
        score,
        currency_claimed,
        events,
        dt,
    };
    let step = match mode {
        Mode::Submerged => submerged.update(&mut frame),
        Mode::Airborne => airborne.update(&mut frame),
        Mode::Ground => ModeStep::Continue,
    };

    match step {
        ModeStep::Continue => {}
        ModeStep::Expired => exit_bonus(state),
        ModeStep::Fatal(cause) => {
            game_over(state, cause);
            return;
        }
    }
    state.player.update(ground_y, hold, dt);
}

/// Enter `target` from the ground
///
/// Portals only exist on the ground, so a request while a bonus mode is
/// active is ignored.
pub fn switch_mode(state: &mut RunState, target: Mode) {
    if state.mode != Mode::Ground || target == Mode::Ground {
        return;
    }
    let view_width = state.viewport.width;
    let ground_y = state.ground_y();
    match target {
        Mode::Submerged => state.submerged.enter(view_width, ground_y, &mut state.rng),
        Mode::Airborne => state.airborne.enter(view_width, ground_y, &mut state.rng),
        Mode::Ground => {}
    }
    state.mode = target;
    state.player.set_profile(PhysicsProfile::from(target));
    state.events.push(GameEvent::ModeEntered { mode: target });
}

/// Leave the active bonus mode for the ground
fn exit_bonus(state: &mut RunState) {
    let mode = state.mode;
    match mode {
        Mode::Submerged => state.submerged.clear(),
        Mode::Airborne => state.airborne.clear(),
        Mode::Ground => return,
    }
    state.mode = Mode::Ground;
    state.player.set_profile(PhysicsProfile::Ground);
    state
        .player
        .grant_invulnerability(MODE_EXIT_INVULNERABILITY_MS);
    log::info!("Back on the ground after {mode:?} at score {}", state.display_score());
    state.events.push(GameEvent::ModeExited { mode });
}

/// End the run and settle its currency; returns the summary
pub fn game_over(state: &mut RunState, cause: DeathCause) -> Option<RunSummary> {
    if !state.is_running() {
        return None;
    }
    state.status = RunStatus::Over(cause);

    let final_score = state.display_score();
    let owed = (final_score as f64 / SCORE_PER_CURRENCY).floor() as u64;
    let mut earned = owed.saturating_sub(state.currency_claimed);
    if state.loadout.booster {
        earned *= 2;
    }
    if earned > 0 {
        state.currency_claimed = owed;
    }

    let summary = RunSummary {
        difficulty: state.difficulty,
        final_score,
        cause,
        obstacles_passed: state.stats.obstacles_passed,
        max_obstacles_per_second: state.stats.pass_rate.max_per_second,
        color_switches: state.stats.color_switches,
        max_switches_per_second: state.stats.switch_rate.max_per_second,
        elapsed_secs: state.elapsed,
        currency_earned: earned,
        booster_applied: state.loadout.booster,
        revive_available: !state.revived,
    };
    log::info!(
        "Run over: {cause} score={final_score} passed={} currency={earned}",
        summary.obstacles_passed
    );
    state.events.push(GameEvent::RunEnded(summary.clone()));
    Some(summary)
}

/// Resume a finished run once; the mode it ended in stays active
pub fn revive(state: &mut RunState) -> bool {
    if state.is_running() || state.revived {
        return false;
    }
    state.status = RunStatus::Running;
    state.revived = true;
    state.stats.revives += 1;

    let player = &mut state.player;
    player.grant_invulnerability(REVIVE_INVULNERABILITY_MS);
    player.pos.y = player
        .pos
        .y
        .min(state.viewport.ground_y() - player.height - REVIVE_LIFT);
    player.vy = 0.0;

    log::info!("Run revived at score {}", state.display_score());
    state.events.push(GameEvent::Revived);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Loadout, Settings};
    use crate::sim::airborne::FloatingText;
    use glam::Vec2;
    use crate::sim::state::{GroundColor, ObstacleKind};
    use crate::sim::track::Obstacle;
    use crate::tuning::Difficulty;

    const DT: f32 = 1.0 / 60.0;

    fn normal() -> RunState {
        RunState::new(&Settings {
            difficulty: Difficulty::Normal,
            seed: 12345,
            ..Default::default()
        })
    }

    fn obstacle_on_player(state: &mut RunState) {
        state.track.obstacles.push(Obstacle {
            x: state.player.pos.x + 5.0,
            kind: ObstacleKind::UraniumFlask,
            passed: false,
        });
    }

    #[test]
    fn test_normal_jump_scenario() {
        let mut state = normal();
        assert_eq!(state.speed, 9.0);
        assert!(jump(&mut state));
        assert_eq!(state.player.vy, -21.0);
        assert!(!state.player.grounded);
        assert!(!jump(&mut state));

        let mut frames = 0;
        while !state.player.grounded && frames < 100 {
            tick(&mut state, &FrameInput::default(), DT);
            frames += 1;
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.vy, 0.0);
        assert_eq!(state.player.bottom(), state.ground_y());
    }

    #[test]
    fn test_ground_frame_accrues_score() {
        let mut state = normal();
        for _ in 0..10 {
            tick(&mut state, &FrameInput::default(), DT);
        }
        assert!(state.is_running());
        assert_eq!(state.frames, 10);
        assert!((state.score - 15.0).abs() < 1e-9);
        assert_eq!(state.display_score(), 15);
    }

    #[test]
    fn test_speed_steps_on_accel_frames() {
        let mut state = normal();
        state.player.grant_invulnerability(1.0e9);
        state.portals.next_spawn = f32::INFINITY;
        for _ in 0..599 {
            tick(&mut state, &FrameInput::default(), DT);
        }
        assert_eq!(state.speed, 9.0);
        tick(&mut state, &FrameInput::default(), DT);
        assert_eq!(state.speed, 10.0);
        assert!(state.drain_events().contains(&GameEvent::SpeedUp { speed: 10.0 }));
    }

    #[test]
    fn test_wrong_color_ends_run() {
        let mut state = normal();
        state.track.segments[0].color = GroundColor::Dark;
        tick(&mut state, &FrameInput::default(), DT);
        assert_eq!(
            state.status,
            RunStatus::Over(DeathCause::WrongColor {
                ground: GroundColor::Dark
            })
        );
        // Nothing moves once the run is over
        let frames = state.frames;
        tick(&mut state, &FrameInput::default(), DT);
        assert_eq!(state.frames, frames);
    }

    #[test]
    fn test_switch_before_landing_saves_run() {
        let mut state = normal();
        state.track.segments[0].color = GroundColor::Dark;
        let input = FrameInput {
            switch: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.is_running());
        assert_eq!(state.stats.color_switches, 1);
        assert_eq!(state.player.last_switch_time, Some(0.0));
    }

    #[test]
    fn test_shield_loadout_absorbs_one_hit() {
        let mut state = RunState::new(&Settings {
            loadout: Loadout {
                shield: true,
                ..Default::default()
            },
            ..Default::default()
        });
        obstacle_on_player(&mut state);
        tick(&mut state, &FrameInput::default(), DT);
        assert!(state.is_running());
        assert_eq!(state.shield_charges, 0);
        assert!(state.player.is_invulnerable());
        assert!(state.drain_events().contains(&GameEvent::ShieldConsumed));
    }

    #[test]
    fn test_obstacle_without_shield_is_fatal() {
        let mut state = normal();
        obstacle_on_player(&mut state);
        tick(&mut state, &FrameInput::default(), DT);
        assert_eq!(state.status, RunStatus::Over(DeathCause::HazardContact));
        let events = state.drain_events();
        let Some(GameEvent::RunEnded(summary)) = events.last() else {
            panic!("expected a run-ended event, got {events:?}");
        };
        assert_eq!(summary.cause, DeathCause::HazardContact);
        assert!(summary.revive_available);
    }

    #[test]
    fn test_submerged_exits_after_ten_seconds() {
        let mut state = normal();
        switch_mode(&mut state, Mode::Submerged);
        assert_eq!(state.mode, Mode::Submerged);
        assert_eq!(state.player.profile, PhysicsProfile::Submerged);
        state.submerged.clear();

        let mut frames = 0;
        while state.mode == Mode::Submerged && frames < 1000 {
            // No reward time collected, and nothing to run into
            state.submerged.clear();
            tick(&mut state, &FrameInput::default(), DT);
            frames += 1;
        }
        assert_eq!(state.mode, Mode::Ground);
        assert!(state.is_running());
        assert!((599..=601).contains(&frames), "exited after {frames} frames");
        assert_eq!(state.player.profile, PhysicsProfile::Ground);
        // One ground-physics frame already ran on the exit frame
        assert!(state.player.invulnerable_ms > MODE_EXIT_INVULNERABILITY_MS - 20.0);
        assert!(state.drain_events().contains(&GameEvent::ModeExited { mode: Mode::Submerged }));
    }

    #[test]
    fn test_airborne_exits_after_ten_seconds() {
        let mut state = normal();
        switch_mode(&mut state, Mode::Airborne);
        assert_eq!(state.player.profile, PhysicsProfile::Airborne);

        let mut frames = 0;
        while state.mode == Mode::Airborne && frames < 1000 {
            state.airborne.birds.clear();
            state.airborne.eagles.clear();
            state.airborne.labels.push(FloatingText {
                pos: Vec2::new(300.0, 200.0),
                text: "+20".to_string(),
                life: 1.0,
                currency: false,
            });
            tick(&mut state, &FrameInput::default(), DT);
            frames += 1;
        }
        assert_eq!(state.mode, Mode::Ground);
        assert!(state.is_running());
        assert!((599..=601).contains(&frames), "exited after {frames} frames");
        assert_eq!(state.player.profile, PhysicsProfile::Ground);
        assert!(state.player.invulnerable_ms > MODE_EXIT_INVULNERABILITY_MS - 20.0);
        assert!(state.airborne.birds.is_empty());
        assert!(state.airborne.eagles.is_empty());
        assert!(state.airborne.labels.is_empty());
        assert!(state.drain_events().contains(&GameEvent::ModeExited { mode: Mode::Airborne }));
    }

    #[test]
    fn test_portal_ignored_outside_ground() {
        let mut state = normal();
        switch_mode(&mut state, Mode::Airborne);
        assert_eq!(state.mode, Mode::Airborne);
        let timer = state.airborne.timer;
        switch_mode(&mut state, Mode::Submerged);
        assert_eq!(state.mode, Mode::Airborne);
        assert_eq!(state.airborne.timer, timer);
    }

    #[test]
    fn test_portal_hit_switches_mode_without_scoring() {
        let mut state = normal();
        tick(&mut state, &FrameInput::default(), DT);
        let score = state.score;
        let center = state.player.center();
        state.portals.portals.push(crate::sim::portal::Portal {
            pos: center,
            radius: PORTAL_RADIUS,
            target: Mode::Airborne,
            rotation: 0.0,
            pulse: 0.0,
        });
        tick(&mut state, &FrameInput::default(), DT);
        assert_eq!(state.mode, Mode::Airborne);
        assert!(state.portals.portals.is_empty());
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_game_over_currency() {
        let mut state = RunState::new(&Settings {
            loadout: Loadout {
                booster: true,
                ..Default::default()
            },
            ..Default::default()
        });
        state.score = 1234.9;
        state.currency_claimed = 20;
        let summary = game_over(&mut state, DeathCause::Eagle).unwrap();
        assert_eq!(summary.final_score, 1234);
        // (123 - 20) doubled
        assert_eq!(summary.currency_earned, 206);
        assert!(summary.booster_applied);
        assert_eq!(state.currency_claimed, 123);
        assert!(game_over(&mut state, DeathCause::Eagle).is_none());
    }

    #[test]
    fn test_revive_once() {
        let mut state = normal();
        assert!(!revive(&mut state));
        game_over(&mut state, DeathCause::HazardContact);
        assert!(revive(&mut state));
        assert!(state.is_running());
        assert_eq!(state.player.invulnerable_ms, REVIVE_INVULNERABILITY_MS);
        assert_eq!(state.player.bottom(), state.ground_y() - REVIVE_LIFT);
        assert_eq!(state.player.vy, 0.0);

        let summary = game_over(&mut state, DeathCause::HazardContact).unwrap();
        assert!(!summary.revive_available);
        assert!(!revive(&mut state));
        assert_eq!(state.stats.revives, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = normal();
        let mut state2 = normal();
        let input = FrameInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }
        assert_eq!(state1.frames, state2.frames);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.mode, state2.mode);
        assert_eq!(state1.status, state2.status);
        assert_eq!(state1.track.segments.len(), state2.track.segments.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
