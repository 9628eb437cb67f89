use serde::Serialize;

use crate::catalog::BuildingLevel;
use crate::config::GameSettings;
use crate::listeners::Listeners;

use super::action_card::ActionCard;

/// A building on the grid as shown in the resume popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingLevelsPair {
    /// Base level followed by every upgrade of the building type.
    pub levels: Vec<BuildingLevel>,
    pub current: BuildingLevel,
}

/// Everything the resume popup displays for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeReport {
    pub turn: u32,
    pub buildings: Vec<BuildingLevelsPair>,
    /// Money per round after any card adjustment, without building income.
    pub round_money: i64,
    /// Satisfaction from the card (or the starting value), without buildings.
    pub round_satisfaction: i32,
    pub total_earned: i64,
    pub total_satisfaction: i32,
}

/// Notifications from the turn cycle to its presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum TurnSignal {
    ResumeOpened { report: ResumeReport },
    ResumeClosed,
    ActionPopupOpened,
    ActionPopupClosed,
    NextTurnPanelOpened,
    NextTurnPanelClosed,
    TurnStarted { turn: u32 },
    GameOver {
        money: i64,
        satisfaction: i32,
        summary: String,
    },
}

/// Shared flags and counters read by the turn-cycle guards.
#[derive(Debug)]
pub struct TurnReferences {
    pub resume_button_pressed: bool,
    pub next_turn_button_pressed: bool,
    pub action_card: Option<ActionCard>,
    pub action_deck: Vec<ActionCard>,
    pub money_per_round: i64,
    pub starting_satisfaction: i32,
    pub max_turns: u32,
    current_turn: u32,
    pub has_clicked_on_grid_initially: bool,
    pub signals: Listeners<TurnSignal>,
}

impl TurnReferences {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            resume_button_pressed: false,
            next_turn_button_pressed: false,
            action_card: None,
            action_deck: ActionCard::standard_deck(),
            money_per_round: settings.money_per_round,
            starting_satisfaction: settings.starting_satisfaction,
            max_turns: settings.max_turns.max(1),
            current_turn: 0,
            has_clicked_on_grid_initially: false,
            signals: Listeners::default(),
        }
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// Called once per resume.
    pub fn increase_turn(&mut self) {
        self.current_turn += 1;
    }

    pub fn is_first_turn(&self) -> bool {
        self.current_turn == 1
    }

    pub fn is_last_turn(&self) -> bool {
        self.current_turn == self.max_turns
    }

    pub fn emit(&mut self, signal: TurnSignal) {
        self.signals.emit(&signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_predicates() {
        let settings = GameSettings {
            max_turns: 2,
            ..Default::default()
        };
        let mut refs = TurnReferences::from_settings(&settings);
        assert!(!refs.is_first_turn());
        refs.increase_turn();
        assert!(refs.is_first_turn());
        assert!(!refs.is_last_turn());
        refs.increase_turn();
        assert!(refs.is_last_turn());
    }
}
