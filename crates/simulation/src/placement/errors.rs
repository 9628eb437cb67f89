use std::fmt;

use bevy::prelude::*;

/// Why a placement command was rejected. A rejected command changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    NothingSelected,
    NoStructure { cell: IVec2 },
    OutOfBounds,
    Occupied,
    Unbuildable,
    InsufficientFunds { cost: u32, balance: i64 },
    NoUpgradeAvailable,
}

impl PlacementError {
    /// Ordinary gameplay outcomes, as opposed to callers breaking the contract.
    pub fn is_domain_rejection(&self) -> bool {
        !matches!(
            self,
            PlacementError::NothingSelected | PlacementError::NoStructure { .. }
        )
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::NothingSelected => write!(f, "No cell selected"),
            PlacementError::NoStructure { cell } => {
                write!(f, "No building at {}, {}", cell.x, cell.y)
            }
            PlacementError::OutOfBounds => write!(f, "Footprint leaves the grid"),
            PlacementError::Occupied => write!(f, "At least one footprint cell is occupied"),
            PlacementError::Unbuildable => write!(f, "Ground under the footprint is not buildable"),
            PlacementError::InsufficientFunds { cost, balance } => {
                write!(f, "Not enough money: costs {cost}, have {balance}")
            }
            PlacementError::NoUpgradeAvailable => {
                write!(f, "No more upgrades available for this building")
            }
        }
    }
}

impl std::error::Error for PlacementError {}
