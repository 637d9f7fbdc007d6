use std::cell::RefCell;
use std::rc::Rc;

use schrodinger_runner::consts::FRAME_INTERVAL_MS;
use schrodinger_runner::sim::{DeathCause, GameEvent, GroundColor, RunStatus, RunSummary};
use schrodinger_runner::{Difficulty, Loadout, RunListener, Session, Settings};

#[derive(Default)]
struct Recorder {
    events: Vec<GameEvent>,
    summaries: Vec<RunSummary>,
}

struct Shared(Rc<RefCell<Recorder>>);

impl RunListener for Shared {
    fn on_event(&mut self, event: &GameEvent) -> anyhow::Result<()> {
        self.0.borrow_mut().events.push(event.clone());
        Ok(())
    }

    fn run_ended(&mut self, summary: &RunSummary) -> anyhow::Result<()> {
        self.0.borrow_mut().summaries.push(summary.clone());
        Ok(())
    }
}

struct Broken;

impl RunListener for Broken {
    fn run_ended(&mut self, _summary: &RunSummary) -> anyhow::Result<()> {
        anyhow::bail!("leaderboard unavailable")
    }
}

/// Host timestamp of the k-th frame at the target rate, just past the grid
/// line so rounding never lands a frame short of the interval
fn host_time(k: u32) -> f64 {
    f64::from(k) * FRAME_INTERVAL_MS + 0.001
}

fn play(session: &mut Session, seconds: f64) -> Option<RunSummary> {
    let mut k = 1;
    while host_time(k) < seconds * 1000.0 {
        if let Some(summary) = session.frame(host_time(k)) {
            return Some(summary);
        }
        k += 1;
    }
    None
}

#[test]
fn failing_listener_does_not_hide_run_end() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut session = Session::new(Settings::default());
    session.add_listener(Box::new(Broken));
    session.add_listener(Box::new(Shared(recorder.clone())));

    // Standing still on light ground while the ribbon turns dark ends the run
    let summary = play(&mut session, 60.0).expect("run should end");
    assert!(matches!(summary.cause, DeathCause::WrongColor { ground: GroundColor::Dark }));

    let recorder = recorder.borrow();
    assert_eq!(recorder.summaries, vec![summary.clone()]);
    assert!(matches!(recorder.events.last(), Some(GameEvent::RunEnded(_))));
}

#[test]
fn autopilot_runs_are_reproducible() {
    let settings = Settings {
        difficulty: Difficulty::Easy,
        seed: 2024,
        loadout: Loadout {
            shield: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut a = Session::new(settings.clone());
    let mut b = Session::new(settings);
    a.set_autopilot(true);
    b.set_autopilot(true);

    let end_a = play(&mut a, 40.0);
    let end_b = play(&mut b, 40.0);
    assert_eq!(end_a, end_b);
    assert_eq!(a.state.score, b.state.score);
    assert_eq!(a.state.stats.obstacles_passed, b.state.stats.obstacles_passed);
    assert!(a.state.display_score() > 0);
}

#[test]
fn wormhole_and_booster_settle_currency() {
    let mut session = Session::new(Settings {
        loadout: Loadout {
            wormhole: true,
            booster: true,
            ..Default::default()
        },
        ..Default::default()
    });
    assert_eq!(session.state.score, 1000.0);
    assert_eq!(session.state.speed, 11.0);

    session.state.track.segments[0].color = GroundColor::Dark;
    let summary = play(&mut session, 1.0).expect("run should end");
    // 1001 points -> 100 units, doubled
    assert_eq!(summary.final_score, 1001);
    assert_eq!(summary.currency_earned, 200);
    assert_eq!(session.state.status, RunStatus::Over(summary.cause));
}

#[test]
fn target_rate_host_simulates_every_frame() {
    let mut session = Session::new(Settings::default());
    session.state.player.grant_invulnerability(1.0e9);
    session.state.portals.next_spawn = f32::INFINITY;

    for k in 1..=600 {
        assert!(session.frame(host_time(k)).is_none());
    }
    // The first frame only primes the clock
    assert_eq!(session.state.frames, 600);
    assert!((session.state.elapsed - 599.0 / 60.0).abs() < 1e-3);
}
