use std::fmt;

use bevy::prelude::*;

use crate::building_registry::BuildingRegistry;
use crate::listeners::{ListenerId, Listeners};
use crate::placed_structure::PlacedStructure;

/// Broadcast whenever a structure is placed, upgraded or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridChanged {
    /// The structure after the change, `None` on removal.
    pub structure: Option<PlacedStructure>,
    /// Every cell the structure covers.
    pub cells: Vec<IVec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    NotEnoughBoundaryMarkers { found: usize },
    DegenerateBounds,
    InvalidCellSize,
    TooLarge { width: i32, height: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::NotEnoughBoundaryMarkers { found } => {
                write!(f, "Need exactly 4 boundary markers, got {found}")
            }
            GridError::DegenerateBounds => {
                write!(f, "Boundary markers enclose less than one cell")
            }
            GridError::InvalidCellSize => write!(f, "Cell size must be positive and finite"),
            GridError::TooLarge { width, height } => {
                write!(f, "Grid of {width}x{height} cells is too large")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Grid dimensions derived from the four corner markers of the playable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    pub center: Vec2,
}

impl GridBounds {
    /// Markers may come in any order. `offset` shifts the derived center.
    pub fn from_markers(markers: &[Vec2], cell_size: f32, offset: Vec2) -> Result<Self, GridError> {
        if markers.len() != 4 {
            return Err(GridError::NotEnoughBoundaryMarkers {
                found: markers.len(),
            });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize);
        }

        let mut sorted = markers.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y));
        let (top_left, top_right) = split_by_x(sorted[0], sorted[1]);
        let (bottom_left, bottom_right) = split_by_x(sorted[2], sorted[3]);

        let extent_x = top_left.distance(top_right);
        let extent_y = top_left.distance(bottom_left);
        let center = (top_left + top_right + bottom_left + bottom_right) / 4.0;

        let width = (extent_x / cell_size).floor() as i32;
        let height = (extent_y / cell_size).floor() as i32;
        if width < 1 || height < 1 {
            return Err(GridError::DegenerateBounds);
        }
        cell_count(width, height)?;

        Ok(Self {
            width,
            height,
            cell_size,
            center: center + offset,
        })
    }
}

/// Number of cells in a `width` x `height` grid, if it fits in memory indexing.
fn cell_count(width: i32, height: i32) -> Result<usize, GridError> {
    width
        .checked_mul(height)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(GridError::TooLarge { width, height })
}

fn split_by_x(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    if a.x < b.x {
        (a, b)
    } else {
        (b, a)
    }
}

/// Fixed-size lattice of cell payloads with world-space conversion.
///
/// The grid also owns the [`BuildingRegistry`], which it updates before any
/// external listener hears about a change.
pub struct SpatialGrid<T> {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec2,
    cells: Vec<T>,
    registry: BuildingRegistry,
    listeners: Listeners<GridChanged>,
}

impl<T> fmt::Debug for SpatialGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("registry", &self.registry.len())
            .finish()
    }
}

impl<T> SpatialGrid<T> {
    /// Build every cell eagerly. `center` is the world position of the grid's middle.
    pub fn new(
        width: i32,
        height: i32,
        cell_size: f32,
        center: Vec2,
        mut factory: impl FnMut(IVec2) -> T,
    ) -> Result<Self, GridError> {
        let width = width.max(0);
        let height = height.max(0);
        let origin = center - Vec2::new(width as f32, height as f32) * cell_size * 0.5;

        let mut cells = Vec::with_capacity(cell_count(width, height)?);
        for y in 0..height {
            for x in 0..width {
                cells.push(factory(IVec2::new(x, y)));
            }
        }

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            cells,
            registry: BuildingRegistry::default(),
            listeners: Listeners::default(),
        })
    }

    pub fn from_bounds(
        bounds: &GridBounds,
        factory: impl FnMut(IVec2) -> T,
    ) -> Result<Self, GridError> {
        Self::new(
            bounds.width,
            bounds.height,
            bounds.cell_size,
            bounds.center,
            factory,
        )
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    fn index(&self, cell: IVec2) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Not bounds-checked: positions outside the grid give out-of-range cells.
    pub fn world_to_cell(&self, world: Vec2) -> IVec2 {
        ((world - self.origin) / self.cell_size).floor().as_ivec2()
    }

    /// Lower-left corner of the cell.
    pub fn cell_to_world(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.cell_size + self.origin
    }

    pub fn cell_center_world(&self, cell: IVec2) -> Vec2 {
        self.cell_to_world(cell) + Vec2::splat(self.cell_size / 2.0)
    }

    /// `None` outside the grid.
    pub fn get(&self, cell: IVec2) -> Option<&T> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.cells.get(self.index(cell))
    }

    pub fn get_mut(&mut self, cell: IVec2) -> Option<&mut T> {
        if !self.in_bounds(cell) {
            return None;
        }
        let idx = self.index(cell);
        self.cells.get_mut(idx)
    }

    pub fn get_at_world(&self, world: Vec2) -> Option<&T> {
        self.get(self.world_to_cell(world))
    }

    pub fn registry(&self) -> &BuildingRegistry {
        &self.registry
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&GridChanged) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn trigger_grid_changed(&mut self, change: GridChanged) {
        self.registry.apply(&change);
        self.listeners.emit(&change);
    }
}
