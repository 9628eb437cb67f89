use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingLevel, CatalogEntry};

/// Stable handle to a placed building. Cells store this instead of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub u32);

/// One building standing on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedStructure {
    pub id: StructureId,
    /// Index into the building catalog.
    pub entry_index: usize,
    /// Bottom-left cell of the footprint.
    pub origin: IVec2,
    /// 0 is the base level, N means N upgrades applied. Never decreases.
    pub upgrade_index: usize,
    /// Cached copy of the current level.
    pub info: BuildingLevel,
    pub cells: Vec<IVec2>,
}

impl PlacedStructure {
    pub fn new(id: StructureId, entry_index: usize, entry: &CatalogEntry, origin: IVec2) -> Self {
        Self {
            id,
            entry_index,
            origin,
            upgrade_index: 0,
            info: entry.base.clone(),
            cells: entry.footprint(origin),
        }
    }

    pub fn is_base_state(&self) -> bool {
        self.upgrade_index == 0
    }

    pub fn next_upgrade<'a>(&self, entry: &'a CatalogEntry) -> Option<&'a BuildingLevel> {
        entry.next_upgrade(self.upgrade_index)
    }

    /// Move to the next level and refresh the cached info. Returns false at the last level.
    pub fn apply_upgrade(&mut self, entry: &CatalogEntry) -> bool {
        let Some(next) = entry.next_upgrade(self.upgrade_index) else {
            return false;
        };
        self.info = next.clone();
        self.upgrade_index += 1;
        true
    }
}

/// Owner of every live [`PlacedStructure`].
#[derive(Debug, Default)]
pub struct StructureStore {
    next_id: u32,
    structures: BTreeMap<StructureId, PlacedStructure>,
}

impl StructureStore {
    pub fn insert(&mut self, entry_index: usize, entry: &CatalogEntry, origin: IVec2) -> StructureId {
        let id = StructureId(self.next_id);
        self.next_id += 1;
        self.structures
            .insert(id, PlacedStructure::new(id, entry_index, entry, origin));
        id
    }

    pub fn get(&self, id: StructureId) -> Option<&PlacedStructure> {
        self.structures.get(&id)
    }

    pub fn get_mut(&mut self, id: StructureId) -> Option<&mut PlacedStructure> {
        self.structures.get_mut(&id)
    }

    pub fn remove(&mut self, id: StructureId) -> Option<PlacedStructure> {
        self.structures.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedStructure> {
        self.structures.values()
    }
}
