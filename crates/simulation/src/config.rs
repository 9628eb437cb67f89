use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// World units per grid cell. Cell size divided by tiles per building gives a perfect fit.
pub const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Corner samples are inset by `cell_size / CORNER_SAMPLE_DIVISOR` from each cell edge.
pub const CORNER_SAMPLE_DIVISOR: f32 = 25.0;

/// Selling a building refunds `cost / REFUND_DIVISOR` (integer division).
pub const REFUND_DIVISOR: u32 = 2;

/// Largest building side, in cells.
pub const MAX_FOOTPRINT: i32 = 10;

pub const MONEY_PER_ROUND: i64 = 8000;
pub const STARTING_SATISFACTION: i32 = 20;
pub const MAX_TURNS: u32 = 12;
pub const STARTING_MONEY: i64 = 0;

pub const SATISFACTION_MIN: i32 = 0;
pub const SATISFACTION_MAX: i32 = 100;

/// Bounce played on a building visual when it is placed or upgraded.
pub const BOUNCE_DURATION: f32 = 0.1;
pub const BOUNCE_HEIGHT: f32 = 0.1;
pub const BOUNCE_WIDTH: f32 = 0.1;

/// Tunables for one session. Every field falls back to the constants above.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub money_per_round: i64,
    pub starting_satisfaction: i32,
    pub max_turns: u32,
    pub starting_money: i64,
    pub cell_size: f32,
    /// Shifts the grid center after it is derived from the boundary markers.
    pub grid_offset: Vec2,
    /// The four corners of the playable area, in any order.
    pub boundary_markers: Vec<Vec2>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            money_per_round: MONEY_PER_ROUND,
            starting_satisfaction: STARTING_SATISFACTION,
            max_turns: MAX_TURNS,
            starting_money: STARTING_MONEY,
            cell_size: DEFAULT_CELL_SIZE,
            grid_offset: Vec2::ZERO,
            boundary_markers: vec![
                Vec2::new(-10.0, 10.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
            ],
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_constants() {
        let settings = GameSettings::default();
        assert_eq!(settings.money_per_round, 8000);
        assert_eq!(settings.starting_satisfaction, 20);
        assert_eq!(settings.max_turns, 12);
        assert_eq!(settings.boundary_markers.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = GameSettings::from_json(r#"{"max_turns": 3, "cell_size": 4.0}"#).unwrap();
        assert_eq!(settings.max_turns, 3);
        assert_eq!(settings.cell_size, 4.0);
        assert_eq!(settings.money_per_round, MONEY_PER_ROUND);
    }

    #[test]
    fn test_markers_parse_as_arrays() {
        let settings = GameSettings::from_json(
            r#"{"boundary_markers": [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [4.0, 4.0]]}"#,
        )
        .unwrap();
        assert_eq!(settings.boundary_markers[1], Vec2::new(4.0, 0.0));
    }
}
