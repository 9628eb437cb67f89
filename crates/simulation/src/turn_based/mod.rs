//! The turn cycle: resume popup, action card, free building, game over.

mod action_card;
mod brain;
mod context;
mod plugin;
mod references;
mod states;

pub use action_card::{adjusted_money_per_round, ActionCard};
pub use brain::TurnBasedBrain;
pub use context::{TurnContext, TurnPhase};
pub use plugin::{clear_pointer_tap, tick_turn_based_brain, TurnBasedPlugin};
pub use references::{BuildingLevelsPair, ResumeReport, TurnReferences, TurnSignal};
pub use states::{ActionState, BuildState, GameOverState, ResumeState};
