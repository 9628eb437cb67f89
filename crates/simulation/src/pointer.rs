use bevy::prelude::*;

/// Pointer input for the current frame, written by the host before the
/// simulation ticks. `tapped` is cleared at the end of every frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub world_position: Vec2,
    pub over_ui: bool,
    pub tapped: bool,
}

impl PointerState {
    pub fn tap_at(world_position: Vec2) -> Self {
        Self {
            world_position,
            over_ui: false,
            tapped: true,
        }
    }
}
