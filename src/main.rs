//! Schrödinger Runner entry point
//!
//! The native build is a headless runner: it plays one run with the
//! autopilot through the same frame clock a browser host would drive, and
//! prints the run summary.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use schrodinger_runner::consts::FRAME_INTERVAL_MS;
    use schrodinger_runner::sim::{GameEvent, RunSummary};
    use schrodinger_runner::{Difficulty, RunListener, Session, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "schrodinger-runner")]
    #[command(about = "Play a headless run of the color-matching runner")]
    pub struct Cli {
        /// Difficulty (EASY, NORMAL, HARD, EXTREME)
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Run seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many simulated seconds if the run is still going
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Start with a shield charge
        #[arg(long)]
        shield: bool,

        /// Start with the wormhole boost
        #[arg(long)]
        wormhole: bool,

        /// Double end-of-run currency
        #[arg(long)]
        booster: bool,

        /// Write the run summary as JSON to this file
        #[arg(long)]
        summary: Option<PathBuf>,
    }

    /// Writes the run summary to disk when the run ends
    struct SummaryFile {
        path: PathBuf,
    }

    impl RunListener for SummaryFile {
        fn run_ended(&mut self, summary: &RunSummary) -> anyhow::Result<()> {
            let json = serde_json::to_string_pretty(summary)?;
            fs::write(&self.path, json)
                .with_context(|| format!("writing summary to {}", self.path.display()))?;
            log::info!("Summary written to {}", self.path.display());
            Ok(())
        }
    }

    /// Logs mode changes as they happen
    struct ModeLog;

    impl RunListener for ModeLog {
        fn on_event(&mut self, event: &GameEvent) -> anyhow::Result<()> {
            match event {
                GameEvent::ModeEntered { mode } => log::info!("Entered {mode:?}"),
                GameEvent::ShieldConsumed => log::info!("Shield consumed"),
                GameEvent::Revived => log::info!("Revived"),
                _ => {}
            }
            Ok(())
        }

        fn run_ended(&mut self, _summary: &RunSummary) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn build_settings(cli: &Cli) -> Settings {
        let mut settings = match &cli.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(id) = &cli.difficulty {
            settings.difficulty = Difficulty::parse_or_default(id);
        }
        if let Some(seed) = cli.seed {
            settings.seed = seed;
        }
        settings.loadout.shield |= cli.shield;
        settings.loadout.wormhole |= cli.wormhole;
        settings.loadout.booster |= cli.booster;
        settings
    }

    pub fn run(cli: Cli) -> anyhow::Result<()> {
        let settings = build_settings(&cli);
        log::info!(
            "Headless run: difficulty={} seed={} theme={:?}",
            settings.difficulty,
            settings.seed,
            settings.theme
        );

        let mut session = Session::new(settings);
        session.set_autopilot(true);
        session.add_listener(Box::new(ModeLog));
        if let Some(path) = cli.summary.clone() {
            session.add_listener(Box::new(SummaryFile { path }));
        }

        // One host frame per target interval, stamped just past each grid
        // line so accumulated rounding never drops a frame
        let limit_ms = cli.seconds * 1000.0;
        let mut summary = None;
        let mut k: u64 = 1;
        loop {
            let now = k as f64 * FRAME_INTERVAL_MS + 0.001;
            if now > limit_ms + FRAME_INTERVAL_MS {
                break;
            }
            if let Some(ended) = session.frame(now) {
                summary = Some(ended);
                break;
            }
            k += 1;
        }

        match summary {
            Some(summary) => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            None => {
                println!(
                    "Still running after {:.1}s: score={} passed={} mode={:?}",
                    session.state.elapsed,
                    session.state.display_score(),
                    session.state.stats.obstacles_passed,
                    session.state.mode
                );
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Schrödinger Runner (native) starting...");
    native::run(native::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Session::frame` directly
}
