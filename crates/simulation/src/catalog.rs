//! Static building definitions.
//!
//! A [`CatalogEntry`] describes one building type: its footprint, its base
//! level and the ordered upgrade chain. Entries are immutable once the
//! catalog is built; placed structures refer to them by index.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MAX_FOOTPRINT;

/// Per-turn effect of a building level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub income: i64,
    /// Percentage points, expected within -100..=100.
    pub satisfaction_increase: i32,
}

/// One level of a building: the base level or one of its upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingLevel {
    pub name: String,
    pub cost: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Visual prefab key, opaque to the simulation. Pivot is the bottom-left corner.
    #[serde(default)]
    pub visual: String,
}

impl BuildingLevel {
    pub fn is_affordable(&self, balance: i64) -> bool {
        balance >= i64::from(self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub base: BuildingLevel,
    #[serde(default = "one")]
    pub width: i32,
    #[serde(default = "one")]
    pub height: i32,
    /// Leave empty for buildings without upgrades.
    #[serde(default)]
    pub upgrades: Vec<BuildingLevel>,
}

fn one() -> i32 {
    1
}

impl CatalogEntry {
    pub fn new(base: BuildingLevel, width: i32, height: i32) -> Self {
        Self {
            base,
            width,
            height,
            upgrades: Vec::new(),
        }
    }

    pub fn with_upgrade(mut self, level: BuildingLevel) -> Self {
        self.upgrades.push(level);
        self
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn cost(&self) -> u32 {
        self.base.cost
    }

    pub fn has_upgrades(&self) -> bool {
        !self.upgrades.is_empty()
    }

    /// Cells covered when the entry is placed with its bottom-left at `origin`,
    /// x-major (all y for x = 0 first).
    pub fn footprint(&self, origin: IVec2) -> Vec<IVec2> {
        let capacity = (self.width.max(0) as usize).saturating_mul(self.height.max(0) as usize);
        let mut cells = Vec::with_capacity(capacity);
        for x in 0..self.width {
            for y in 0..self.height {
                cells.push(IVec2::new(origin.x + x, origin.y + y));
            }
        }
        cells
    }

    /// The upgrade that follows `upgrade_index` upgrades, i.e. `upgrades[upgrade_index]`.
    pub fn next_upgrade(&self, upgrade_index: usize) -> Option<&BuildingLevel> {
        self.upgrades.get(upgrade_index)
    }

    /// Level after `upgrade_index` upgrades: 0 is the base level.
    pub fn level(&self, upgrade_index: usize) -> Option<&BuildingLevel> {
        match upgrade_index {
            0 => Some(&self.base),
            n => self.upgrades.get(n - 1),
        }
    }

    /// Base level followed by every upgrade.
    pub fn all_levels(&self) -> Vec<BuildingLevel> {
        std::iter::once(&self.base)
            .chain(self.upgrades.iter())
            .cloned()
            .collect()
    }

    fn owns(&self, level: &BuildingLevel) -> bool {
        self.base == *level || self.upgrades.contains(level)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Empty,
    InvalidFootprint {
        name: String,
        width: i32,
        height: i32,
    },
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "Building catalog has no entries"),
            CatalogError::InvalidFootprint {
                name,
                width,
                height,
            } => write!(
                f,
                "Building '{name}' has invalid footprint {width}x{height} (both must be 1..={MAX_FOOTPRINT})"
            ),
            CatalogError::Parse(msg) => write!(f, "Failed to parse building catalog: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered list of every building the player can cycle through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingCatalog {
    entries: Vec<CatalogEntry>,
}

impl BuildingCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let sides = 1..=MAX_FOOTPRINT;
        if let Some(bad) = entries
            .iter()
            .find(|e| !sides.contains(&e.width) || !sides.contains(&e.height))
        {
            return Err(CatalogError::InvalidFootprint {
                name: bad.base.name.clone(),
                width: bad.width,
                height: bad.height,
            });
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(entries)
    }

    /// Small built-in catalog used by the headless host and the tests.
    pub fn standard() -> Self {
        let level = |name: &str, cost: u32, income: i64, satisfaction: i32, description: &str| {
            BuildingLevel {
                name: name.to_string(),
                cost,
                description: description.to_string(),
                modifiers: Modifiers {
                    income,
                    satisfaction_increase: satisfaction,
                },
                visual: name.to_lowercase().replace(' ', "_"),
            }
        };

        let entries = vec![
            CatalogEntry::new(level("House", 1000, 200, 2, "A small family home."), 1, 1)
                .with_upgrade(level("Town House", 1500, 400, 3, "Two more floors."))
                .with_upgrade(level("Apartment Block", 3000, 900, 1, "Dense and profitable.")),
            CatalogEntry::new(level("Park", 1200, 0, 6, "Green space for everyone."), 2, 2)
                .with_upgrade(level("Botanical Garden", 2500, 100, 10, "Rare plants draw visitors.")),
            CatalogEntry::new(level("Market", 2000, 600, -1, "Stalls and noise."), 2, 1)
                .with_upgrade(level("Mall", 4001, 1500, -3, "Everything under one roof.")),
        ];

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Every level of the entry that owns `level`, base first.
    pub fn all_levels_of(&self, level: &BuildingLevel) -> Option<Vec<BuildingLevel>> {
        let found = self
            .entries
            .iter()
            .find(|entry| entry.owns(level))
            .map(CatalogEntry::all_levels);
        if found.is_none() {
            error!(
                "Building level '{}' is not part of any catalog entry",
                level.name
            );
        }
        found
    }
}
