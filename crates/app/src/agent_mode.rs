//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.

use std::io::{BufRead, Write};

use bevy::core::FrameCount;
use bevy::prelude::*;

use simulation::agent_protocol::{
    make_response, AgentCommand, AgentResponse, ResponsePayload, PROTOCOL_VERSION,
};
use simulation::observation_builder::CurrentObservation;
use simulation::pointer::PointerState;
use simulation::TurnBasedBrain;

/// Frames a single `step` command may run.
const MAX_STEP_FRAMES: u32 = 10_000;

pub fn run_agent_mode(mut app: App) {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    // Send the "ready" message so the external program knows we are live.
    write_response(&mut stdout, &make_response(ResponsePayload::Ready));

    // Log to stderr so it does not interfere with the JSON protocol on stdout.
    eprintln!("turnstead agent mode v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let cmd: AgentCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let resp = make_response(ResponsePayload::Error {
                    message: format!("Parse error: {e}"),
                });
                write_response(&mut stdout, &resp);
                continue;
            }
        };

        let response = process_command(cmd, &mut app);
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    eprintln!("turnstead agent mode shutting down");
}

fn write_response(out: &mut impl Write, response: &AgentResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
        Err(e) => eprintln!("failed to serialize response: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    match cmd {
        AgentCommand::Observe => {
            let observation = app
                .world()
                .get_resource::<CurrentObservation>()
                .map(|co| co.observation.clone())
                .unwrap_or_default();
            make_response(ResponsePayload::Observation { observation })
        }

        AgentCommand::Tap { x, y } => {
            *app.world_mut().resource_mut::<PointerState>() =
                PointerState::tap_at(Vec2::new(x, y));
            app.update();
            make_response(ResponsePayload::Ok)
        }

        AgentCommand::Button { button } => {
            let result = with_brain(app, |brain| {
                brain.press_button(button).map_err(|e| e.to_string())
            });
            // Run a frame so bounce requests and the observation catch up.
            app.update();
            respond(result)
        }

        AgentCommand::ChooseCard { index } => {
            let result = with_brain(app, |brain| {
                brain.choose_card(index).map_err(str::to_string)
            });
            app.update();
            respond(result)
        }

        AgentCommand::Resume => {
            let result = with_brain(app, |brain| {
                brain.press_resume();
                Ok(())
            });
            app.update();
            respond(result)
        }

        AgentCommand::NextTurn => {
            let result = with_brain(app, |brain| {
                brain.press_next_turn();
                Ok(())
            });
            app.update();
            respond(result)
        }

        AgentCommand::Step { frames } => {
            for _ in 0..frames.min(MAX_STEP_FRAMES) {
                app.update();
            }
            let frame = app
                .world()
                .get_resource::<FrameCount>()
                .map(|f| f.0)
                .unwrap_or(0);
            make_response(ResponsePayload::StepComplete { frame })
        }

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

fn with_brain(
    app: &mut App,
    f: impl FnOnce(&mut TurnBasedBrain) -> Result<(), String>,
) -> Result<(), String> {
    match app.world_mut().get_resource_mut::<TurnBasedBrain>() {
        Some(mut brain) => f(&mut brain),
        None => Err("no game is running".to_string()),
    }
}

fn respond(result: Result<(), String>) -> AgentResponse {
    match result {
        Ok(()) => make_response(ResponsePayload::Ok),
        Err(message) => make_response(ResponsePayload::Error { message }),
    }
}
