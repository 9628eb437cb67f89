use bevy::prelude::*;

use crate::catalog::{BuildingCatalog, CatalogEntry};
use crate::config::{GameSettings, CORNER_SAMPLE_DIVISOR};
use crate::currency::{refund_for, Treasury};
use crate::grid::{GridBounds, GridChanged, GridError, SpatialGrid};
use crate::grid_cell::GridCell;
use crate::listeners::{ListenerId, Listeners};
use crate::placed_structure::{PlacedStructure, StructureId, StructureStore};
use crate::pointer::PointerState;
use crate::terrain::BuildableGround;

use super::errors::PlacementError;
use super::signals::{InformationType, PlacementSignal};

/// Selection, validation and mutation of buildings on the grid.
///
/// Commands never leave partial state behind: a rejected command returns
/// `Err` (or `false`) with the grid, the structures and the treasury exactly
/// as they were.
pub struct PlacementController {
    grid: SpatialGrid<GridCell>,
    catalog: BuildingCatalog,
    structures: StructureStore,
    ground: Box<dyn BuildableGround>,
    selected_entry: usize,
    selected_cell: Option<IVec2>,
    signals: Listeners<PlacementSignal>,
    animation_requests: Vec<StructureId>,
}

impl std::fmt::Debug for PlacementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementController")
            .field("grid", &self.grid)
            .field("structures", &self.structures.len())
            .field("selected_entry", &self.selected_entry)
            .field("selected_cell", &self.selected_cell)
            .finish()
    }
}

impl PlacementController {
    pub fn new(
        grid: SpatialGrid<GridCell>,
        catalog: BuildingCatalog,
        ground: impl BuildableGround + 'static,
    ) -> Self {
        Self {
            grid,
            catalog,
            structures: StructureStore::default(),
            ground: Box::new(ground),
            selected_entry: 0,
            selected_cell: None,
            signals: Listeners::default(),
            animation_requests: Vec::new(),
        }
    }

    /// Build the grid from the settings' boundary markers. Logs and aborts on bad markers.
    pub fn from_settings(
        settings: &GameSettings,
        catalog: BuildingCatalog,
        ground: impl BuildableGround + 'static,
    ) -> Result<Self, GridError> {
        let bounds = GridBounds::from_markers(
            &settings.boundary_markers,
            settings.cell_size,
            settings.grid_offset,
        )
        .inspect_err(|e| error!("Grid construction aborted: {e}"))?;

        info!(
            "Grid created: {}x{} cells of {} units around {}",
            bounds.width, bounds.height, bounds.cell_size, bounds.center
        );
        let grid = SpatialGrid::from_bounds(&bounds, GridCell::new)
            .inspect_err(|e| error!("Grid construction aborted: {e}"))?;
        Ok(Self::new(grid, catalog, ground))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn grid(&self) -> &SpatialGrid<GridCell> {
        &self.grid
    }

    /// Mutable grid access, for subscribing to grid changes.
    pub fn grid_mut(&mut self) -> &mut SpatialGrid<GridCell> {
        &mut self.grid
    }

    pub fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    pub fn structures(&self) -> &StructureStore {
        &self.structures
    }

    pub fn selected_cell(&self) -> Option<IVec2> {
        self.selected_cell
    }

    pub fn selected_entry_index(&self) -> usize {
        self.selected_entry
    }

    pub fn selected_entry(&self) -> &CatalogEntry {
        &self.catalog.entries()[self.selected_entry]
    }

    pub fn structure_at(&self, cell: IVec2) -> Option<&PlacedStructure> {
        let id = self.grid.get(cell)?.structure()?;
        self.structures.get(id)
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&PlacementSignal) + Send + Sync + 'static,
    ) -> ListenerId {
        self.signals.add(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.signals.remove(id)
    }

    /// Structures placed or upgraded since the last call, for the bounce animation.
    pub fn drain_animation_requests(&mut self) -> Vec<StructureId> {
        std::mem::take(&mut self.animation_requests)
    }

    /// Cell coordinates, plus the current level name when occupied.
    pub fn debug_label(&self, cell: IVec2) -> Option<String> {
        let grid_cell = self.grid.get(cell)?;
        Some(match self.structure_at(cell) {
            Some(structure) => format!("{grid_cell}\n{}", structure.info.name),
            None => grid_cell.to_string(),
        })
    }

    fn emit(&mut self, signal: PlacementSignal) {
        self.signals.emit(&signal);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Center of the cell followed by its four corners, each inset by cell_size / 25.
    pub fn corner_samples(&self, cell: IVec2) -> [Vec2; 5] {
        let size = self.grid.cell_size();
        let center = self.grid.cell_center_world(cell);
        let reach = size / 2.0 - size / CORNER_SAMPLE_DIVISOR;
        [
            center,
            center + Vec2::new(-reach, reach),
            center + Vec2::new(reach, reach),
            center + Vec2::new(-reach, -reach),
            center + Vec2::new(reach, -reach),
        ]
    }

    /// First reason `entry` cannot stand with its bottom-left at `origin`.
    pub fn check_footprint(&self, origin: IVec2, entry: &CatalogEntry) -> Result<(), PlacementError> {
        if !self.grid.in_bounds(origin) {
            return Err(PlacementError::OutOfBounds);
        }
        for cell in entry.footprint(origin) {
            let Some(grid_cell) = self.grid.get(cell) else {
                return Err(PlacementError::OutOfBounds);
            };
            if grid_cell.is_occupied() {
                return Err(PlacementError::Occupied);
            }
            let samples = self.corner_samples(cell);
            if !samples.iter().all(|p| self.ground.is_buildable(*p)) {
                return Err(PlacementError::Unbuildable);
            }
        }
        Ok(())
    }

    pub fn can_place_footprint(&self, origin: IVec2, entry: &CatalogEntry) -> bool {
        self.check_footprint(origin, entry).is_ok()
    }

    /// Whether any catalog entry fits at `origin`.
    pub fn can_place_any(&self, origin: IVec2) -> bool {
        self.catalog
            .entries()
            .iter()
            .any(|entry| self.can_place_footprint(origin, entry))
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Resolve a tap to a cell and select it. Returns false when nothing was selected.
    pub fn select_cell(&mut self, pointer: &PointerState, treasury: &dyn Treasury) -> bool {
        if pointer.over_ui {
            return false;
        }

        let cell = self.grid.world_to_cell(pointer.world_position);
        let occupied = match self.grid.get(cell) {
            Some(grid_cell) => grid_cell.is_occupied(),
            None => {
                debug!("Tap at cell {cell} is outside the grid");
                return false;
            }
        };

        if occupied {
            if self.selected_cell.is_some() {
                self.reset_selected_cell();
            }
            let position = self.grid.cell_center_world(cell);
            self.emit(PlacementSignal::UpgradePanelOpened { position });
            self.selected_cell = Some(cell);
            return true;
        }

        if !self.can_place_any(cell) {
            return false;
        }

        if self.selected_cell.is_some() {
            self.reset_selected_cell();
        }
        self.selected_cell = Some(cell);

        let position = self.grid.cell_center_world(cell);
        self.emit(PlacementSignal::BuildPanelOpened { position });
        self.emit_selection_changed(cell);
        self.broadcast_build_status(cell, treasury);
        true
    }

    pub fn reset_selected_cell(&mut self) {
        self.selected_cell = None;
        self.emit(PlacementSignal::StoppedBuilding);
    }

    /// Cycle the ghost entry, wrapping at both ends.
    pub fn change_selected_entry(&mut self, forward: bool, treasury: &dyn Treasury) {
        let len = self.catalog.len();
        self.selected_entry = if forward {
            (self.selected_entry + 1) % len
        } else {
            (self.selected_entry + len - 1) % len
        };

        let Some(cell) = self.selected_cell else {
            debug!("Changed building to '{}' without a selected cell", self.selected_entry().name());
            return;
        };
        self.emit_selection_changed(cell);
        self.broadcast_build_status(cell, treasury);
    }

    /// Recompute affordability for the current selection, e.g. after the balance changed.
    pub fn refresh_build_status(&mut self, treasury: &dyn Treasury) {
        if let Some(cell) = self.selected_cell {
            self.broadcast_build_status(cell, treasury);
        }
    }

    fn emit_selection_changed(&mut self, cell: IVec2) {
        let position = self.grid.cell_to_world(cell);
        let entry_index = self.selected_entry;
        let name = self.selected_entry().name().to_string();
        self.emit(PlacementSignal::SelectionChanged {
            position,
            entry_index,
            name,
        });
    }

    fn broadcast_build_status(&mut self, cell: IVec2, treasury: &dyn Treasury) {
        let entry = self.selected_entry();
        let cost = entry.cost();
        let fits = self.can_place_footprint(cell, entry);
        let can_afford = treasury.can_afford(cost);

        self.emit(PlacementSignal::MoneyChanged {
            can_afford,
            cost_text: cost.to_string(),
        });
        self.emit(PlacementSignal::CanBuildChanged {
            can_build: fits && can_afford,
        });
    }

    // -------------------------------------------------------------------------
    // Building
    // -------------------------------------------------------------------------

    /// Place the ghost entry at the selected cell and pay for it.
    pub fn place_selected(&mut self, treasury: &mut dyn Treasury) -> Result<StructureId, PlacementError> {
        let origin = self.selected_cell.ok_or(PlacementError::NothingSelected)?;
        let entry_index = self.selected_entry;
        let entry = self.selected_entry();

        if let Err(reason) = self.check_footprint(origin, entry) {
            debug!("Can't build at {}, {}: {reason}", origin.x, origin.y);
            return Err(reason);
        }
        let cost = entry.cost();
        if !treasury.can_afford(cost) {
            debug!("Not enough money for '{}'", entry.name());
            return Err(PlacementError::InsufficientFunds {
                cost,
                balance: treasury.balance(),
            });
        }

        self.emit(PlacementSignal::StoppedBuilding);

        let entry = &self.catalog.entries()[entry_index];
        let id = self.structures.insert(entry_index, entry, origin);
        let Some(structure) = self.structures.get(id).cloned() else {
            error!("Structure {id:?} vanished right after insertion");
            return Err(PlacementError::NoStructure { cell: origin });
        };
        for cell in &structure.cells {
            if let Some(grid_cell) = self.grid.get_mut(*cell) {
                grid_cell.set_structure(id);
            }
        }
        let cells = structure.cells.clone();
        info!("Placed '{}' at {}, {}", structure.info.name, origin.x, origin.y);
        self.grid.trigger_grid_changed(GridChanged {
            structure: Some(structure),
            cells,
        });
        self.animation_requests.push(id);

        treasury.spend(cost);

        let position = self.grid.cell_center_world(origin);
        self.emit(PlacementSignal::UpgradePanelOpened { position });
        Ok(id)
    }

    /// Sell the building at the selected cell for half its current level cost.
    pub fn delete_selected(&mut self, treasury: &mut dyn Treasury) -> Result<u32, PlacementError> {
        let Some(cell) = self.selected_cell else {
            error!("Delete requested without a selected cell");
            return Err(PlacementError::NothingSelected);
        };
        let Some(id) = self.grid.get(cell).and_then(GridCell::structure) else {
            error!("No building to delete at {}, {}", cell.x, cell.y);
            return Err(PlacementError::NoStructure { cell });
        };
        let Some(structure) = self.structures.remove(id) else {
            error!("Cell {}, {} points at a missing building", cell.x, cell.y);
            return Err(PlacementError::NoStructure { cell });
        };

        let refund = refund_for(structure.info.cost);
        treasury.earn(i64::from(refund));
        info!("Sold '{}' for {refund}", structure.info.name);

        self.grid.trigger_grid_changed(GridChanged {
            structure: None,
            cells: structure.cells.clone(),
        });
        for c in &structure.cells {
            if let Some(grid_cell) = self.grid.get_mut(*c) {
                grid_cell.clear_structure();
            }
        }
        Ok(refund)
    }

    /// Buy the next level for the building at the selected cell. Returns the new upgrade index.
    pub fn request_upgrade(&mut self, treasury: &mut dyn Treasury) -> Result<usize, PlacementError> {
        let cell = self.selected_cell.ok_or(PlacementError::NothingSelected)?;
        let Some(id) = self.grid.get(cell).and_then(GridCell::structure) else {
            error!("No building to upgrade at {}, {}", cell.x, cell.y);
            return Err(PlacementError::NoStructure { cell });
        };
        let Some(structure) = self.structures.get(id) else {
            return Err(PlacementError::NoStructure { cell });
        };
        let Some(entry) = self.catalog.get(structure.entry_index) else {
            error!("Building {id:?} refers to unknown catalog entry {}", structure.entry_index);
            return Err(PlacementError::NoStructure { cell });
        };

        let Some(next) = structure.next_upgrade(entry) else {
            info!("No more upgrades available for '{}'", structure.info.name);
            return Err(PlacementError::NoUpgradeAvailable);
        };
        if !treasury.can_afford(next.cost) {
            debug!("Not enough money to upgrade to '{}'", next.name);
            return Err(PlacementError::InsufficientFunds {
                cost: next.cost,
                balance: treasury.balance(),
            });
        }
        treasury.spend(next.cost);

        let Some(structure) = self.structures.get_mut(id) else {
            return Err(PlacementError::NoStructure { cell });
        };
        structure.apply_upgrade(entry);
        let snapshot = structure.clone();
        let upgrade_index = snapshot.upgrade_index;
        info!("Upgraded building to '{}'", snapshot.info.name);

        let cells = snapshot.cells.clone();
        self.grid.trigger_grid_changed(GridChanged {
            structure: Some(snapshot),
            cells,
        });
        self.animation_requests.push(id);
        Ok(upgrade_index)
    }

    // -------------------------------------------------------------------------
    // Information panels
    // -------------------------------------------------------------------------

    /// Show the base level of the ghost entry.
    pub fn setup_building_information(&mut self) {
        let level = self.selected_entry().base.clone();
        self.emit(PlacementSignal::BuildingInfoChanged {
            level: Some(level),
            kind: InformationType::Current,
        });
    }

    pub fn open_upgrade_information(&mut self) {
        let Some(structure) = self.selected_structure() else {
            return;
        };
        let next = self
            .catalog
            .get(structure.entry_index)
            .and_then(|entry| structure.next_upgrade(entry))
            .cloned();
        let kind = match next {
            Some(_) => InformationType::Upgrade,
            None => InformationType::None,
        };
        self.emit(PlacementSignal::BuildingInfoChanged { level: next, kind });
    }

    pub fn open_current_building_information(&mut self) {
        let Some(structure) = self.selected_structure() else {
            return;
        };
        let level = structure.info.clone();
        self.emit(PlacementSignal::BuildingInfoChanged {
            level: Some(level),
            kind: InformationType::Current,
        });
    }

    fn selected_structure(&self) -> Option<&PlacedStructure> {
        let Some(cell) = self.selected_cell else {
            error!("Information requested without a selected cell");
            return None;
        };
        let structure = self.structure_at(cell);
        if structure.is_none() {
            error!("No building found at {}, {}", cell.x, cell.y);
        }
        structure
    }
}
