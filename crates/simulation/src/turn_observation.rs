//! Compact, typed, serializable snapshot of a running game.
//!
//! `TurnObservation` is what an external agent sees each time it asks: the
//! phase, the purse, the board and the tutorial, in one struct.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::turn_based::TurnPhase;

// ---------------------------------------------------------------------------
// Top-level observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TurnObservation {
    // -- Time ---------------------------------------------------------------
    pub frame: u32,
    pub phase: TurnPhase,
    pub turn: u32,
    pub max_turns: u32,

    // -- Economy ------------------------------------------------------------
    pub money: i64,
    pub satisfaction: i32,
    pub money_per_round: i64,

    // -- Board --------------------------------------------------------------
    pub grid_width: i32,
    pub grid_height: i32,
    pub selected_cell: Option<IVec2>,
    /// Catalog entry shown by the build panel.
    pub selected_building: String,
    pub structure_count: usize,
    pub buildings: Vec<BuildingSnapshot>,
    pub panels: PanelSnapshot,

    // -- Tutorial -----------------------------------------------------------
    pub tutorial_state: Option<String>,
    pub tutorial_hint: Option<usize>,

    pub warnings: Vec<TurnWarning>,
}

// ---------------------------------------------------------------------------
// Sub-snapshots
// ---------------------------------------------------------------------------

/// One registry entry: a building's current level at its footprint centroid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingSnapshot {
    pub centroid: IVec2,
    pub name: String,
    pub income: i64,
    pub satisfaction: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub build: bool,
    pub upgrade: bool,
    pub info: bool,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnWarning {
    /// Not even the cheapest building is affordable.
    CannotAffordAnything,
    LowSatisfaction,
    LastTurn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_default_is_empty() {
        let obs = TurnObservation::default();
        assert_eq!(obs.frame, 0);
        assert_eq!(obs.phase, TurnPhase::Resume);
        assert!(obs.buildings.is_empty());
        assert!(obs.warnings.is_empty());
    }

    #[test]
    fn observation_serializes_to_json() {
        let obs = TurnObservation {
            frame: 42,
            phase: TurnPhase::Build,
            turn: 3,
            max_turns: 12,
            money: 5400,
            satisfaction: 31,
            selected_cell: Some(IVec2::new(2, 4)),
            buildings: vec![BuildingSnapshot {
                centroid: IVec2::new(2, 4),
                name: "House".into(),
                income: 200,
                satisfaction: 2,
            }],
            warnings: vec![TurnWarning::LowSatisfaction],
            ..Default::default()
        };
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"frame\":42"));
        assert!(json.contains("\"phase\":\"build\""));
        assert!(json.contains("LowSatisfaction"));
        assert!(json.contains("House"));
    }
}
