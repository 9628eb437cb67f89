//! Query helpers for `TestGame`.

use bevy::prelude::*;

use crate::bounce::BounceAnimations;
use crate::currency::Treasury;
use crate::observation_builder::CurrentObservation;
use crate::turn_based::{TurnBasedBrain, TurnPhase};
use crate::turn_observation::TurnObservation;

use super::TestGame;

impl TestGame {
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn brain(&self) -> &TurnBasedBrain {
        self.resource::<TurnBasedBrain>()
    }

    pub fn brain_mut(&mut self) -> Mut<'_, TurnBasedBrain> {
        self.world_mut().resource_mut::<TurnBasedBrain>()
    }

    pub fn has_brain(&self) -> bool {
        self.app.world().get_resource::<TurnBasedBrain>().is_some()
    }

    pub fn phase(&self) -> TurnPhase {
        self.brain().phase()
    }

    pub fn turn(&self) -> u32 {
        self.brain().context().references.current_turn()
    }

    pub fn money(&self) -> i64 {
        self.brain().context().portfolio.balance()
    }

    pub fn satisfaction(&self) -> i32 {
        self.brain().context().portfolio.satisfaction()
    }

    pub fn structure_count(&self) -> usize {
        self.brain().context().placement.structures().len()
    }

    pub fn selected_cell(&self) -> Option<IVec2> {
        self.brain().context().placement.selected_cell()
    }

    /// Snapshot stored by the last frame.
    pub fn observation(&self) -> &TurnObservation {
        &self.resource::<CurrentObservation>().observation
    }

    pub fn bounces(&self) -> &BounceAnimations {
        self.resource::<BounceAnimations>()
    }

    pub fn hint(&self) -> Option<usize> {
        self.brain().current_hint()
    }
}
