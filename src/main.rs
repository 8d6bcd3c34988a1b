//! Pose Runner entry point
//!
//! Headless driver: runs the simulation at a simulated 60 Hz display rate,
//! records finished runs to the leaderboard and restarts. The autopilot
//! plays unless `--manual` hands control to the pose source.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pose_runner::platform::{FrameClock, GestureInput, NoCamera};
use pose_runner::sim::{FrameView, GameEvent, GameState, TickInput, tick};
use pose_runner::{ConfigError, HighScores, Ruleset, RulesetPreset};

/// Simulated display refresh
const DISPLAY_DT: f32 = 1.0 / 60.0;

fn parse_preset(name: &str) -> Result<RulesetPreset, String> {
    RulesetPreset::parse(name)
        .ok_or_else(|| format!("unknown preset '{name}' (classic, arcade, practice)"))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON ruleset file; missing fields take the defaults.
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    rules: Option<PathBuf>,
    /// Named ruleset preset.
    #[arg(long, value_name = "NAME", value_parser = parse_preset)]
    preset: Option<RulesetPreset>,
    /// Session seed for world generation.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Display frames to simulate.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 60 * 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frames: u64,
    /// Leaderboard file.
    #[arg(long, value_name = "FILE", default_value = "highscores.json")]
    scores: PathBuf,
    /// Drive the player from the pose source instead of the autopilot.
    #[arg(long)]
    manual: bool,
}

impl Args {
    /// Resolve the rules to play with. An explicit file must load cleanly.
    fn ruleset(&self) -> Result<Ruleset, ConfigError> {
        match (&self.rules, self.preset) {
            (Some(path), _) => Ruleset::load(path),
            (None, Some(preset)) => Ok(Ruleset::from_preset(preset)),
            (None, None) => Ok(Ruleset::default()),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let rules = match args.ruleset() {
        Ok(rules) => rules,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Pose Runner (headless) starting...");
    let mut state = GameState::new(args.seed, rules);
    let mut highscores = HighScores::load_or_default(&args.scores);
    let mut gestures = GestureInput::new(NoCamera::new());
    let mut clock = FrameClock::new(state.rules.tick_rate);

    log::info!(
        "Seed {}, {} Hz, running {} display frames ({})",
        state.seed,
        state.rules.tick_rate,
        args.frames,
        if args.manual { "manual" } else { "autopilot" }
    );

    let mut restart_pending = false;
    for frame in 0..args.frames {
        let signal = gestures.sample();

        for _ in 0..clock.advance(DISPLAY_DT) {
            let input = TickInput {
                signal,
                restart: restart_pending,
                autopilot: !args.manual,
            };
            tick(&mut state, &input);

            for event in &state.events {
                match event {
                    GameEvent::GameOver { .. } => {
                        highscores.record_run(&state);
                        if let Err(e) = highscores.save(&args.scores) {
                            log::warn!("Could not save high scores: {}", e);
                        }
                        restart_pending = true;
                    }
                    GameEvent::Restarted => restart_pending = false,
                    _ => {}
                }
            }
        }

        if frame % 600 == 0 && log::log_enabled!(log::Level::Debug) {
            match FrameView::capture(&state).to_json() {
                Ok(json) => log::debug!("frame {}: {}", frame, json),
                Err(e) => log::warn!("Could not serialize frame view: {}", e),
            }
        }
    }

    log::info!(
        "Finished: score {}, {} runs, best {}",
        state.score,
        state.runs + 1,
        highscores.top_score().unwrap_or(0)
    );
    ExitCode::SUCCESS
}
