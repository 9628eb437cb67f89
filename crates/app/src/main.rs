//! Headless host for the turn-based town builder.
//!
//! Usage:
//!   turnstead --agent [--settings <path>]
//!   turnstead --autoplay <seed> [--settings <path>]
//!
//! `--settings` loads `GameSettings` from a JSON file; missing fields fall
//! back to their defaults.

mod agent_mode;
mod autoplay;

use std::process::ExitCode;
use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use simulation::catalog::BuildingCatalog;
use simulation::config::GameSettings;
use simulation::TurnBasedPlugin;

/// Simulated length of one frame in both headless modes.
pub const FRAME: Duration = Duration::from_millis(16);

enum Mode {
    Agent,
    Autoplay { seed: u64 },
}

struct CliArgs {
    mode: Mode,
    settings_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut mode = None;
    let mut settings_path = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--agent" => mode = Some(Mode::Agent),
            "--autoplay" => {
                let seed = iter
                    .next()
                    .ok_or("--autoplay needs a seed")?
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed: {e}"))?;
                mode = Some(Mode::Autoplay { seed });
            }
            "--settings" => {
                settings_path = Some(iter.next().ok_or("--settings needs a path")?.clone());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    let mode = mode.ok_or("expected --agent or --autoplay <seed>")?;
    Ok(CliArgs {
        mode,
        settings_path,
    })
}

fn load_settings(path: Option<&str>) -> Result<GameSettings, String> {
    let Some(path) = path else {
        return Ok(GameSettings::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    GameSettings::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

/// Build a headless app around one game and run its first frame.
///
/// Returns `None` when the settings cannot produce a grid.
pub fn build_app(settings: GameSettings) -> Option<App> {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.add_plugins(TurnBasedPlugin::new(settings, BuildingCatalog::standard()));
    app.update();

    app.world()
        .contains_resource::<simulation::TurnBasedBrain>()
        .then_some(app)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: turnstead (--agent | --autoplay <seed>) [--settings <path>]");
            return ExitCode::FAILURE;
        }
    };
    let settings = match load_settings(cli.settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(app) = build_app(settings) else {
        eprintln!("game could not start, see the log above");
        return ExitCode::FAILURE;
    };

    match cli.mode {
        Mode::Agent => agent_mode::run_agent_mode(app),
        Mode::Autoplay { seed } => autoplay::run_autoplay(app, seed),
    }
    ExitCode::SUCCESS
}
