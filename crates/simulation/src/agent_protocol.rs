//! Agent text protocol types for the `--agent` headless mode.
//!
//! Defines the JSON command/response envelope that external programs use to
//! play the game over newline-delimited JSON on stdin/stdout.
//!
//! These types live in the `simulation` crate so they can be unit-tested
//! without pulling in the app binary. The I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::buttons::ButtonType;
use crate::turn_observation::TurnObservation;

// ---------------------------------------------------------------------------
// Commands (stdin → simulation)
// ---------------------------------------------------------------------------

/// A single command sent by the external agent over stdin.
///
/// Each line of stdin is parsed as one `AgentCommand`. The `cmd` field acts as
/// the discriminator tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum AgentCommand {
    /// Request the current observation snapshot.
    #[serde(rename = "observe")]
    Observe,

    /// Tap the world at (x, y), then run one frame.
    #[serde(rename = "tap")]
    Tap { x: f32, y: f32 },

    /// Press a world-space building button.
    #[serde(rename = "button")]
    Button { button: ButtonType },

    /// Pick an action card by deck index.
    #[serde(rename = "choose_card")]
    ChooseCard { index: usize },

    /// Close the resume popup.
    #[serde(rename = "resume")]
    Resume,

    /// End the build phase.
    #[serde(rename = "next_turn")]
    NextTurn,

    /// Run `frames` app updates.
    #[serde(rename = "step")]
    Step { frames: u32 },

    /// Gracefully shut down the agent session.
    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (simulation → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "observation")]
    Observation { observation: TurnObservation },

    #[serde(rename = "ok")]
    Ok,

    /// The command was understood but rejected, or could not be parsed.
    #[serde(rename = "error")]
    Error { message: String },

    /// Frames have run; reports the frame counter.
    #[serde(rename = "step_complete")]
    StepComplete { frame: u32 },

    #[serde(rename = "goodbye")]
    Goodbye,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_observe_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"observe"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Observe));
    }

    #[test]
    fn deserialize_tap_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"tap","x":1.5,"y":-3}"#).unwrap();
        if let AgentCommand::Tap { x, y } = cmd {
            assert_eq!((x, y), (1.5, -3.0));
        } else {
            panic!("expected Tap");
        }
    }

    #[test]
    fn deserialize_button_command() {
        let json = r#"{"cmd":"button","button":"place_building"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            AgentCommand::Button {
                button: ButtonType::PlaceBuilding
            }
        ));
    }

    #[test]
    fn deserialize_choose_card_command() {
        let cmd: AgentCommand =
            serde_json::from_str(r#"{"cmd":"choose_card","index":2}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::ChooseCard { index: 2 }));
    }

    #[test]
    fn deserialize_turn_commands() {
        let resume: AgentCommand = serde_json::from_str(r#"{"cmd":"resume"}"#).unwrap();
        let next: AgentCommand = serde_json::from_str(r#"{"cmd":"next_turn"}"#).unwrap();
        assert!(matches!(resume, AgentCommand::Resume));
        assert!(matches!(next, AgentCommand::NextTurn));
    }

    #[test]
    fn deserialize_step_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"step","frames":10}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Step { frames: 10 }));
    }

    #[test]
    fn deserialize_quit_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"quit"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Quit));
    }

    #[test]
    fn serialize_ready_response() {
        let json = serde_json::to_string(&make_response(ResponsePayload::Ready)).unwrap();
        assert!(json.contains("\"protocol_version\":1"));
        assert!(json.contains("\"type\":\"ready\""));
    }

    #[test]
    fn serialize_observation_response() {
        let resp = make_response(ResponsePayload::Observation {
            observation: TurnObservation::default(),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"observation\""));
        assert!(json.contains("\"phase\":\"resume\""));
    }

    #[test]
    fn serialize_error_response() {
        let resp = make_response(ResponsePayload::Error {
            message: "Cell is occupied".to_string(),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("Cell is occupied"));
    }

    #[test]
    fn serialize_step_complete_response() {
        let resp = make_response(ResponsePayload::StepComplete { frame: 42 });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"step_complete\""));
        assert!(json.contains("\"frame\":42"));
    }

    #[test]
    fn invalid_command_returns_parse_error() {
        assert!(serde_json::from_str::<AgentCommand>(r#"{"cmd":"nonexistent"}"#).is_err());
        assert!(serde_json::from_str::<AgentCommand>(r#"{not valid json"#).is_err());
    }
}
