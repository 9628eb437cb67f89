pub mod agent_protocol;
pub mod bounce;
pub mod building_registry;
pub mod buttons;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod grid;
pub mod grid_cell;
pub mod listeners;
pub mod observation_builder;
pub mod placed_structure;
pub mod placement;
pub mod pointer;
pub mod state_machine;
pub mod terrain;
pub mod turn_based;
pub mod turn_observation;
pub mod tutorial;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use turn_based::{TurnBasedBrain, TurnBasedPlugin, TurnPhase};
