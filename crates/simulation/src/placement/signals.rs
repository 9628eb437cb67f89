use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::BuildingLevel;

/// Which level an information panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InformationType {
    #[default]
    None,
    Current,
    Upgrade,
}

/// Notifications from the placement controller to UI and visual collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementSignal {
    /// Ghost moved or switched entry. `position` is the cell's lower-left corner.
    SelectionChanged {
        position: Vec2,
        entry_index: usize,
        name: String,
    },
    BuildPanelOpened {
        position: Vec2,
    },
    UpgradePanelOpened {
        position: Vec2,
    },
    StoppedBuilding,
    CanBuildChanged {
        can_build: bool,
    },
    MoneyChanged {
        can_afford: bool,
        cost_text: String,
    },
    BuildingInfoChanged {
        level: Option<BuildingLevel>,
        kind: InformationType,
    },
}
