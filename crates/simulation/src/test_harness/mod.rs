//! # TestGame: headless integration test harness
//!
//! Wraps `bevy::app::App` + `TurnBasedPlugin` so whole turns can be played
//! in tests without a window or renderer.

mod assertions;
mod input;
mod queries;

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::catalog::BuildingCatalog;
use crate::config::GameSettings;
use crate::terrain::TileMask;
use crate::turn_based::TurnBasedPlugin;

/// Fixed frame length, so bounce timing is deterministic.
pub const FRAME: Duration = Duration::from_millis(16);

/// A headless Bevy App running one game.
///
/// Input helpers write the pointer or press buttons and then run a frame;
/// query and assertion helpers read the brain and the plugin's resources.
pub struct TestGame {
    app: App,
}

impl TestGame {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A 10x10 grid with the standard catalog and default settings.
    pub fn new() -> Self {
        Self::with_plugin(TurnBasedPlugin::default())
    }

    pub fn with_settings(settings: GameSettings) -> Self {
        Self::with_plugin(TurnBasedPlugin::new(settings, BuildingCatalog::standard()))
    }

    pub fn with_ground(ground: TileMask) -> Self {
        Self::with_plugin(TurnBasedPlugin::default().with_ground(ground))
    }

    pub fn with_plugin(plugin: TurnBasedPlugin) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        app.add_plugins(plugin);
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run `n` frames.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

impl Default for TestGame {
    fn default() -> Self {
        Self::new()
    }
}
