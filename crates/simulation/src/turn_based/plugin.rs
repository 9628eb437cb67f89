use bevy::prelude::*;

use crate::bounce::{advance_bounce_animations, BounceAnimations};
use crate::catalog::BuildingCatalog;
use crate::config::GameSettings;
use crate::observation_builder::{update_current_observation, CurrentObservation};
use crate::pointer::PointerState;
use crate::terrain::{AllBuildable, TileMask};

use super::brain::TurnBasedBrain;

/// Hosts the turn cycle in a Bevy app.
///
/// The host writes [`PointerState`] every frame before `Update`; the tap flag
/// is cleared once the frame's systems have seen it.
#[derive(Debug, Clone)]
pub struct TurnBasedPlugin {
    pub settings: GameSettings,
    pub catalog: BuildingCatalog,
    /// Buildable ground. Everything is buildable when absent.
    pub ground: Option<TileMask>,
}

impl Default for TurnBasedPlugin {
    fn default() -> Self {
        Self::new(GameSettings::default(), BuildingCatalog::standard())
    }
}

impl TurnBasedPlugin {
    pub fn new(settings: GameSettings, catalog: BuildingCatalog) -> Self {
        Self {
            settings,
            catalog,
            ground: None,
        }
    }

    pub fn with_ground(mut self, ground: TileMask) -> Self {
        self.ground = Some(ground);
        self
    }
}

impl Plugin for TurnBasedPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<BounceAnimations>()
            .init_resource::<CurrentObservation>()
            .insert_resource(self.settings.clone());

        let catalog = self.catalog.clone();
        let brain = match &self.ground {
            Some(mask) => TurnBasedBrain::new(&self.settings, catalog, mask.clone()),
            None => TurnBasedBrain::new(&self.settings, catalog, AllBuildable),
        };
        match brain {
            Ok(brain) => {
                app.insert_resource(brain);
            }
            Err(e) => error!("Turn-based game not started: {e}"),
        }

        app.add_systems(
            Update,
            (
                tick_turn_based_brain,
                update_current_observation,
                advance_bounce_animations,
                clear_pointer_tap,
            )
                .chain(),
        );
    }
}

pub fn tick_turn_based_brain(
    pointer: Res<PointerState>,
    brain: Option<ResMut<TurnBasedBrain>>,
    mut bounces: ResMut<BounceAnimations>,
) {
    let Some(mut brain) = brain else {
        return;
    };
    brain.set_pointer(*pointer);
    brain.tick();
    for id in brain.context_mut().placement.drain_animation_requests() {
        bounces.start(id);
    }
}

pub fn clear_pointer_tap(mut pointer: ResMut<PointerState>) {
    if pointer.tapped {
        pointer.tapped = false;
    }
}
