//! Player input helpers for `TestGame`.

use bevy::prelude::*;

use crate::buttons::ButtonType;
use crate::placement::PlacementError;
use crate::pointer::PointerState;

use super::TestGame;

impl TestGame {
    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Tap a world position and run one frame.
    pub fn tap_world(&mut self, position: Vec2) {
        *self.world_mut().resource_mut::<PointerState>() = PointerState::tap_at(position);
        self.tick(1);
    }

    /// Tap the center of a grid cell and run one frame.
    pub fn tap_cell(&mut self, x: i32, y: i32) {
        let position = self
            .brain()
            .context()
            .placement
            .grid()
            .cell_center_world(IVec2::new(x, y));
        self.tap_world(position);
    }

    /// Tap somewhere no cell is, e.g. to advance a tutorial hint.
    pub fn tap_nowhere(&mut self) {
        self.tap_world(Vec2::splat(10_000.0));
    }

    // -----------------------------------------------------------------------
    // Buttons and popups
    // -----------------------------------------------------------------------

    /// Press a building button, then run one frame.
    pub fn press(&mut self, button: ButtonType) -> Result<(), PlacementError> {
        let result = self.brain_mut().press_button(button);
        self.tick(1);
        result
    }

    pub fn resume(&mut self) {
        self.brain_mut().press_resume();
        self.tick(1);
    }

    pub fn choose_card(&mut self, index: usize) {
        self.brain_mut()
            .choose_card(index)
            .unwrap_or_else(|e| panic!("choose_card({index}) failed: {e}"));
        self.tick(1);
    }

    pub fn next_turn(&mut self) {
        self.brain_mut().press_next_turn();
        self.tick(1);
    }

    /// From the resume popup into the build phase with the given card.
    pub fn play_to_build(&mut self, card: usize) {
        self.resume();
        self.choose_card(card);
    }

    /// Tap a cell and place the current ghost building there.
    pub fn build_at(&mut self, x: i32, y: i32) -> Result<(), PlacementError> {
        self.tap_cell(x, y);
        self.press(ButtonType::PlaceBuilding)
    }
}
