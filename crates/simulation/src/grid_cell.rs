use std::fmt;

use bevy::prelude::*;

use crate::placed_structure::StructureId;

/// Occupancy record for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub position: IVec2,
    structure: Option<StructureId>,
}

impl GridCell {
    pub fn new(position: IVec2) -> Self {
        Self {
            position,
            structure: None,
        }
    }

    pub fn structure(&self) -> Option<StructureId> {
        self.structure
    }

    pub fn is_occupied(&self) -> bool {
        self.structure.is_some()
    }

    pub fn set_structure(&mut self, id: StructureId) {
        self.structure = Some(id);
    }

    pub fn clear_structure(&mut self) {
        self.structure = None;
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.position.x, self.position.y)
    }
}
