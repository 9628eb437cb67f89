//! Aggregate of every live structure's current level, keyed by footprint centroid.
//!
//! Kept in sync by [`crate::grid::SpatialGrid::trigger_grid_changed`]. Two
//! footprints whose truncated centroids coincide share a key; the later
//! write wins.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::catalog::{BuildingLevel, Modifiers};
use crate::grid::GridChanged;

/// Integer-truncated average of `cells`. A single cell is its own centroid.
pub fn footprint_centroid(cells: &[IVec2]) -> Option<IVec2> {
    match cells {
        [] => None,
        [only] => Some(*only),
        _ => {
            let sum = cells.iter().fold(IVec2::ZERO, |acc, c| acc + *c);
            Some(sum / cells.len() as i32)
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct BuildingRegistry {
    levels: HashMap<IVec2, BuildingLevel>,
}

impl BuildingRegistry {
    pub fn apply(&mut self, change: &GridChanged) {
        let Some(key) = footprint_centroid(&change.cells) else {
            warn!("Grid change without cells ignored by building registry");
            return;
        };
        match &change.structure {
            None => {
                self.levels.remove(&key);
            }
            Some(structure) => {
                self.levels.insert(key, structure.info.clone());
            }
        }
    }

    pub fn get(&self, centroid: IVec2) -> Option<&BuildingLevel> {
        self.levels.get(&centroid)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Entries ordered by centroid (x, then y).
    pub fn entries(&self) -> Vec<(IVec2, &BuildingLevel)> {
        let mut entries: Vec<_> = self.levels.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(k, _)| (k.x, k.y));
        entries
    }

    /// Sum of income and satisfaction over every registered level.
    pub fn total_modifiers(&self) -> Modifiers {
        self.levels.values().fold(Modifiers::default(), |acc, level| Modifiers {
            income: acc.income + level.modifiers.income,
            satisfaction_increase: acc.satisfaction_increase
                + level.modifiers.satisfaction_increase,
        })
    }
}
