//! A playable session
//!
//! Owns the current run together with the frame clock, the input state and
//! the external collaborators that care about how runs end. The host calls
//! [`Session::frame`] once per animation frame.

use crate::platform::{Action, Button, Controls, FrameClock, FrameDecision};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, RunState, RunSummary, Viewport};
use crate::sim::tick;
use crate::tuning::DifficultyTable;

/// Collaborator notified about the run (persistence, leaderboard, economy,
/// achievements, audio)
pub trait RunListener {
    /// Called for every event as it is drained
    fn on_event(&mut self, _event: &GameEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn run_ended(&mut self, summary: &RunSummary) -> anyhow::Result<()>;
}

pub struct Session {
    pub state: RunState,
    settings: Settings,
    table: DifficultyTable,
    clock: FrameClock,
    controls: Controls,
    autopilot: bool,
    listeners: Vec<Box<dyn RunListener>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_table(settings, DifficultyTable::default())
    }

    pub fn with_table(settings: Settings, table: DifficultyTable) -> Self {
        let state = RunState::with_table(&settings, &table);
        let controls = Controls::new(state.profile.swap_controls);
        Self {
            state,
            settings,
            table,
            clock: FrameClock::new(),
            controls,
            autopilot: false,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn RunListener>) {
        self.listeners.push(listener);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start the next attempt with the same settings and a fresh seed
    pub fn restart(&mut self, seed: u64) {
        self.settings.seed = seed;
        self.state = RunState::with_table(&self.settings, &self.table);
        self.controls = Controls::new(self.state.profile.swap_controls);
        self.clock.reset();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.settings.viewport = viewport;
        self.state.resize(viewport);
    }

    pub fn press(&mut self, button: Button) -> Action {
        self.controls.press(button)
    }

    pub fn release(&mut self, button: Button) {
        self.controls.release(button);
    }

    pub fn release_all(&mut self) {
        self.controls.release_all();
    }

    /// Host frame callback; returns the summary when this frame ended the run
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<RunSummary> {
        if !self.state.is_running() {
            return None;
        }
        let dt = match self.clock.advance(timestamp_ms, self.state.viewport.is_portrait()) {
            FrameDecision::Step(dt) => dt,
            FrameDecision::Dropped | FrameDecision::Paused => return None,
        };

        self.controls.set_autopilot(self.autopilot);
        let input = self.controls.take_frame_input();
        tick::tick(&mut self.state, &input, dt);
        self.dispatch_events()
    }

    /// Use the run's single revive; the clock restarts so the pause in
    /// between is not simulated
    pub fn revive(&mut self) -> bool {
        if !tick::revive(&mut self.state) {
            return false;
        }
        self.clock.reset();
        self.dispatch_events();
        true
    }

    /// Hand drained events to every listener; listener failures are logged
    /// and never stop the run-ended summary from reaching the host
    fn dispatch_events(&mut self) -> Option<RunSummary> {
        let mut ended = None;
        for event in self.state.drain_events() {
            for listener in &mut self.listeners {
                if let Err(err) = listener.on_event(&event) {
                    log::error!("Run listener failed on {event:?}: {err:#}");
                }
            }
            if let GameEvent::RunEnded(summary) = event {
                for listener in &mut self.listeners {
                    if let Err(err) = listener.run_ended(&summary) {
                        log::error!("Run listener failed to record run end: {err:#}");
                    }
                }
                ended = Some(summary);
            }
        }
        ended
    }
}
