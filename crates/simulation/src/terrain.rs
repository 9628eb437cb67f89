//! Buildable-ground predicates consulted by footprint validation.

use std::collections::HashSet;

use bevy::prelude::*;

/// Answers whether the ground at a world position accepts buildings.
pub trait BuildableGround: Send + Sync {
    fn is_buildable(&self, world: Vec2) -> bool;
}

/// Ground that accepts buildings everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllBuildable;

impl BuildableGround for AllBuildable {
    fn is_buildable(&self, _world: Vec2) -> bool {
        true
    }
}

/// Tile layer with its own resolution: a position is buildable when the tile
/// under it is present. Tiles are independent of grid cells, so one cell may
/// span several tiles.
#[derive(Debug, Clone, Default)]
pub struct TileMask {
    origin: Vec2,
    tile_size: f32,
    tiles: HashSet<IVec2>,
}

impl TileMask {
    pub fn new(origin: Vec2, tile_size: f32) -> Self {
        Self {
            origin,
            tile_size,
            tiles: HashSet::new(),
        }
    }

    /// Mask with every tile in `min..=max` present.
    pub fn filled(origin: Vec2, tile_size: f32, min: IVec2, max: IVec2) -> Self {
        let mut mask = Self::new(origin, tile_size);
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                mask.tiles.insert(IVec2::new(x, y));
            }
        }
        mask
    }

    pub fn tile_at(&self, world: Vec2) -> IVec2 {
        ((world - self.origin) / self.tile_size).floor().as_ivec2()
    }

    pub fn set_tile(&mut self, tile: IVec2) {
        self.tiles.insert(tile);
    }

    pub fn remove_tile(&mut self, tile: IVec2) -> bool {
        self.tiles.remove(&tile)
    }
}

impl BuildableGround for TileMask {
    fn is_buildable(&self, world: Vec2) -> bool {
        self.tiles.contains(&self.tile_at(world))
    }
}
