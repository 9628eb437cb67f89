use serde::{Deserialize, Serialize};

use crate::buttons::WorldButtons;
use crate::catalog::BuildingCatalog;
use crate::config::GameSettings;
use crate::currency::CurrencyPortfolio;
use crate::grid::GridError;
use crate::placement::PlacementController;
use crate::pointer::PointerState;
use crate::terrain::BuildableGround;

use super::references::TurnReferences;

/// Which state of the turn cycle is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Resume,
    Action,
    Build,
    GameOver,
}

impl TurnPhase {
    pub fn label(self) -> &'static str {
        match self {
            TurnPhase::Resume => "Resume",
            TurnPhase::Action => "Action",
            TurnPhase::Build => "Build",
            TurnPhase::GameOver => "Game Over",
        }
    }
}

/// Everything the turn-cycle states read and drive.
#[derive(Debug)]
pub struct TurnContext {
    pub references: TurnReferences,
    pub placement: PlacementController,
    pub portfolio: CurrencyPortfolio,
    pub buttons: WorldButtons,
    /// This frame's pointer, copied in by the host before each tick.
    pub pointer: PointerState,
}

impl TurnContext {
    pub fn new(
        settings: &GameSettings,
        catalog: BuildingCatalog,
        ground: impl BuildableGround + 'static,
    ) -> Result<Self, GridError> {
        let mut placement = PlacementController::from_settings(settings, catalog, ground)?;
        let buttons = WorldButtons::new();
        buttons.attach(&mut placement);

        Ok(Self {
            references: TurnReferences::from_settings(settings),
            placement,
            portfolio: CurrencyPortfolio::new(settings.starting_money, 0),
            buttons,
            pointer: PointerState::default(),
        })
    }
}
