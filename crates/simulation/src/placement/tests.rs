use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use super::*;
use crate::catalog::{BuildingCatalog, BuildingLevel, CatalogEntry, CatalogError, Modifiers};
use crate::config::GameSettings;
use crate::currency::{CurrencyPortfolio, Treasury};
use crate::grid::{GridError, SpatialGrid};
use crate::grid_cell::GridCell;
use crate::pointer::PointerState;
use crate::terrain::{AllBuildable, BuildableGround, TileMask};

fn level(name: &str, cost: u32, income: i64, satisfaction: i32) -> BuildingLevel {
    BuildingLevel {
        name: name.to_string(),
        cost,
        description: String::new(),
        modifiers: Modifiers {
            income,
            satisfaction_increase: satisfaction,
        },
        visual: String::new(),
    }
}

/// Hut (1x1, 100, upgrade to Cabin for 80) and Barn (2x2, 300).
fn test_catalog() -> BuildingCatalog {
    BuildingCatalog::new(vec![
        CatalogEntry::new(level("Hut", 100, 10, 1), 1, 1).with_upgrade(level("Cabin", 80, 25, 2)),
        CatalogEntry::new(level("Barn", 300, 40, 0), 2, 2),
    ])
    .unwrap()
}

/// 5x5 grid, cell size 2, centered on the world origin.
fn controller_with(ground: impl BuildableGround + 'static) -> PlacementController {
    let grid = SpatialGrid::new(5, 5, 2.0, Vec2::ZERO, GridCell::new).unwrap();
    PlacementController::new(grid, test_catalog(), ground)
}

fn controller() -> PlacementController {
    controller_with(AllBuildable)
}

fn tap(c: &PlacementController, x: i32, y: i32) -> PointerState {
    PointerState::tap_at(c.grid().cell_center_world(IVec2::new(x, y)))
}

fn select(c: &mut PlacementController, x: i32, y: i32, wallet: &CurrencyPortfolio) -> bool {
    let pointer = tap(c, x, y);
    c.select_cell(&pointer, wallet)
}

fn record(c: &mut PlacementController) -> Arc<Mutex<Vec<PlacementSignal>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    c.subscribe(move |s| sink.lock().unwrap().push(s.clone()));
    seen
}

fn place_at(
    c: &mut PlacementController,
    x: i32,
    y: i32,
    wallet: &mut CurrencyPortfolio,
) -> Result<crate::placed_structure::StructureId, PlacementError> {
    assert!(select(c, x, y, wallet));
    c.place_selected(wallet)
}

#[test]
fn test_place_upgrade_scenario() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(150, 0);

    let id = place_at(&mut c, 2, 2, &mut wallet).unwrap();
    assert_eq!(wallet.money(), 50);
    assert!(c.grid().get(IVec2::new(2, 2)).unwrap().is_occupied());
    assert_eq!(c.grid().registry().len(), 1);

    assert_eq!(
        c.request_upgrade(&mut wallet),
        Err(PlacementError::InsufficientFunds {
            cost: 80,
            balance: 50
        })
    );
    assert_eq!(wallet.money(), 50);
    assert_eq!(c.structures().get(id).unwrap().upgrade_index, 0);

    wallet.earn(100);
    assert_eq!(c.request_upgrade(&mut wallet), Ok(1));
    assert_eq!(wallet.money(), 70);
    let s = c.structures().get(id).unwrap();
    assert_eq!(s.upgrade_index, 1);
    assert_eq!(s.info.name, "Cabin");
}

#[test]
fn test_upgrade_past_last_level_is_noop() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(1000, 0);
    let id = place_at(&mut c, 0, 0, &mut wallet).unwrap();
    c.request_upgrade(&mut wallet).unwrap();
    let before = wallet.money();

    assert_eq!(
        c.request_upgrade(&mut wallet),
        Err(PlacementError::NoUpgradeAvailable)
    );
    assert_eq!(wallet.money(), before);
    let s = c.structures().get(id).unwrap();
    assert_eq!(s.upgrade_index, 1);
    assert_eq!(s.info.cost, 80);
    assert_eq!(s.info.modifiers.income, 25);
}

#[test]
fn test_occupancy_exclusive_until_removed() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(10_000, 0);
    c.change_selected_entry(true, &wallet);
    place_at(&mut c, 1, 1, &mut wallet).unwrap();

    let hut = c.catalog().get(0).unwrap().clone();
    let barn = c.catalog().get(1).unwrap().clone();
    for origin in [IVec2::new(1, 1), IVec2::new(2, 2), IVec2::new(1, 2)] {
        assert_eq!(c.check_footprint(origin, &hut), Err(PlacementError::Occupied));
    }
    assert_eq!(
        c.check_footprint(IVec2::new(0, 0), &barn),
        Err(PlacementError::Occupied)
    );
    assert!(c.can_place_footprint(IVec2::new(3, 3), &barn));

    // Selecting an occupied cell selects the structure, then sell it
    assert!(select(&mut c, 2, 1, &wallet));
    c.delete_selected(&mut wallet).unwrap();
    assert!(c.can_place_footprint(IVec2::new(2, 2), &hut));
    assert!(c.can_place_footprint(IVec2::new(0, 0), &barn));
}

#[test]
fn test_footprint_out_of_bounds() {
    let c = controller();
    let barn = c.catalog().get(1).unwrap().clone();
    assert_eq!(
        c.check_footprint(IVec2::new(4, 4), &barn),
        Err(PlacementError::OutOfBounds)
    );
    assert_eq!(
        c.check_footprint(IVec2::new(-1, 0), &barn),
        Err(PlacementError::OutOfBounds)
    );
    assert!(c.can_place_footprint(IVec2::new(3, 3), &barn));
}

#[test]
fn test_unbuildable_corner_rejects_cell() {
    // Tiles of size 1 covering the whole grid, minus the top-right quarter of cell (2,2)
    let mut mask = TileMask::filled(Vec2::new(-5.0, -5.0), 1.0, IVec2::ZERO, IVec2::new(9, 9));
    mask.remove_tile(IVec2::new(5, 5));
    let mut c = controller_with(mask);
    let wallet = CurrencyPortfolio::new(1000, 0);

    let hut = c.catalog().get(0).unwrap().clone();
    assert_eq!(
        c.check_footprint(IVec2::new(2, 2), &hut),
        Err(PlacementError::Unbuildable)
    );
    assert!(c.can_place_footprint(IVec2::new(1, 1), &hut));
    assert!(!c.can_place_any(IVec2::new(2, 2)));
    assert!(!select(&mut c, 2, 2, &wallet));
    assert_eq!(c.selected_cell(), None);
}

#[test]
fn test_corner_samples_are_inset() {
    let c = controller();
    let samples = c.corner_samples(IVec2::new(2, 2));
    assert_eq!(samples[0], Vec2::ZERO);
    let reach = 1.0 - 2.0 / 25.0;
    assert_eq!(samples[2], Vec2::new(reach, reach));
    assert_eq!(samples[3], Vec2::new(-reach, -reach));
}

#[test]
fn test_refund_is_half_cost_truncated() {
    let grid = SpatialGrid::new(5, 5, 2.0, Vec2::ZERO, GridCell::new).unwrap();
    let catalog = BuildingCatalog::new(vec![CatalogEntry::new(level("Tower", 4001, 0, 0), 1, 1)]).unwrap();
    let mut c = PlacementController::new(grid, catalog, AllBuildable);
    let mut wallet = CurrencyPortfolio::new(4001, 0);

    place_at(&mut c, 3, 3, &mut wallet).unwrap();
    assert_eq!(wallet.money(), 0);
    assert_eq!(c.delete_selected(&mut wallet), Ok(2000));
    assert_eq!(wallet.money(), 2000);
    assert!(c.structures().is_empty());
    assert!(c.grid().registry().is_empty());
    assert!(!c.grid().get(IVec2::new(3, 3)).unwrap().is_occupied());
}

#[test]
fn test_refund_uses_current_level_cost() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(180, 0);
    place_at(&mut c, 0, 0, &mut wallet).unwrap();
    c.request_upgrade(&mut wallet).unwrap();
    assert_eq!(wallet.money(), 0);
    assert_eq!(c.delete_selected(&mut wallet), Ok(40));
}

#[test]
fn test_registry_tracks_live_structures() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(10_000, 0);

    place_at(&mut c, 0, 0, &mut wallet).unwrap();
    c.change_selected_entry(true, &wallet);
    place_at(&mut c, 2, 2, &mut wallet).unwrap();
    assert_eq!(c.grid().registry().len(), 2);
    assert_eq!(c.grid().registry().get(IVec2::new(2, 2)).unwrap().name, "Barn");

    assert!(select(&mut c, 0, 0, &wallet));
    c.request_upgrade(&mut wallet).unwrap();
    assert_eq!(c.grid().registry().get(IVec2::ZERO).unwrap().name, "Cabin");

    assert!(select(&mut c, 3, 3, &wallet));
    c.delete_selected(&mut wallet).unwrap();
    assert_eq!(c.grid().registry().len(), 1);
    assert!(c.grid().registry().get(IVec2::new(2, 2)).is_none());

    let totals = c.grid().registry().total_modifiers();
    assert_eq!(totals.income, 25);
    assert_eq!(totals.satisfaction_increase, 2);
}

#[test]
fn test_rejected_place_changes_nothing() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(99, 0);
    assert!(select(&mut c, 1, 1, &wallet));

    assert_eq!(
        c.place_selected(&mut wallet),
        Err(PlacementError::InsufficientFunds {
            cost: 100,
            balance: 99
        })
    );
    assert_eq!(wallet.money(), 99);
    assert!(c.structures().is_empty());
    assert!(c.grid().registry().is_empty());
    assert_eq!(c.selected_cell(), Some(IVec2::new(1, 1)));
}

#[test]
fn test_commands_without_selection() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(1000, 0);
    assert_eq!(c.place_selected(&mut wallet), Err(PlacementError::NothingSelected));
    assert_eq!(c.delete_selected(&mut wallet), Err(PlacementError::NothingSelected));
    assert_eq!(c.request_upgrade(&mut wallet), Err(PlacementError::NothingSelected));

    assert!(select(&mut c, 4, 4, &wallet));
    assert_eq!(
        c.delete_selected(&mut wallet),
        Err(PlacementError::NoStructure {
            cell: IVec2::new(4, 4)
        })
    );
    assert_eq!(wallet.money(), 1000);
}

#[test]
fn test_select_empty_cell_signals() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(50, 0);
    let seen = record(&mut c);

    assert!(select(&mut c, 2, 2, &wallet));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            PlacementSignal::BuildPanelOpened {
                position: Vec2::ZERO
            },
            PlacementSignal::SelectionChanged {
                position: Vec2::new(-1.0, -1.0),
                entry_index: 0,
                name: "Hut".into()
            },
            PlacementSignal::MoneyChanged {
                can_afford: false,
                cost_text: "100".into()
            },
            PlacementSignal::CanBuildChanged { can_build: false },
        ]
    );
}

#[test]
fn test_reselect_stops_previous_building_first() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(500, 0);
    assert!(select(&mut c, 0, 0, &wallet));
    let seen = record(&mut c);

    assert!(select(&mut c, 1, 0, &wallet));
    let signals = seen.lock().unwrap();
    assert_eq!(signals[0], PlacementSignal::StoppedBuilding);
    assert_eq!(
        signals.last(),
        Some(&PlacementSignal::CanBuildChanged { can_build: true })
    );
    assert_eq!(c.selected_cell(), Some(IVec2::new(1, 0)));
}

#[test]
fn test_select_occupied_cell_opens_upgrade_panel() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(500, 0);
    place_at(&mut c, 3, 1, &mut wallet).unwrap();
    c.reset_selected_cell();
    let seen = record(&mut c);

    assert!(select(&mut c, 3, 1, &wallet));
    let center = c.grid().cell_center_world(IVec2::new(3, 1));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![PlacementSignal::UpgradePanelOpened { position: center }]
    );
}

#[test]
fn test_place_signal_order() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(500, 0);
    assert!(select(&mut c, 3, 1, &wallet));
    let seen = record(&mut c);

    c.place_selected(&mut wallet).unwrap();
    let center = c.grid().cell_center_world(IVec2::new(3, 1));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            PlacementSignal::StoppedBuilding,
            PlacementSignal::UpgradePanelOpened { position: center },
        ]
    );
}

#[test]
fn test_select_rejects_ui_and_outside_taps() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(500, 0);
    let seen = record(&mut c);

    let mut over_ui = tap(&c, 1, 1);
    over_ui.over_ui = true;
    assert!(!c.select_cell(&over_ui, &wallet));

    let outside = PointerState::tap_at(Vec2::new(50.0, 0.0));
    assert!(!c.select_cell(&outside, &wallet));

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(c.selected_cell(), None);
}

#[test]
fn test_change_entry_wraps_and_is_reversible() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(0, 0);
    let len = c.catalog().len();

    c.change_selected_entry(false, &wallet);
    assert_eq!(c.selected_entry_index(), len - 1);
    c.change_selected_entry(true, &wallet);
    assert_eq!(c.selected_entry_index(), 0);

    for n in 1..=5 {
        for _ in 0..n {
            c.change_selected_entry(true, &wallet);
        }
        for _ in 0..n {
            c.change_selected_entry(false, &wallet);
        }
        assert_eq!(c.selected_entry_index(), 0);
    }
}

#[test]
fn test_change_entry_rechecks_fit() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(1000, 0);
    assert!(select(&mut c, 4, 4, &wallet));
    let seen = record(&mut c);

    // Barn is 2x2 and does not fit in the top-right corner
    c.change_selected_entry(true, &wallet);
    let signals = seen.lock().unwrap();
    assert!(matches!(
        &signals[0],
        PlacementSignal::SelectionChanged { entry_index: 1, name, .. } if name.as_str() == "Barn"
    ));
    assert_eq!(
        signals[1],
        PlacementSignal::MoneyChanged {
            can_afford: true,
            cost_text: "300".into()
        }
    );
    assert_eq!(signals[2], PlacementSignal::CanBuildChanged { can_build: false });
}

#[test]
fn test_refresh_build_status_follows_balance() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(0, 0);
    c.refresh_build_status(&wallet);
    let seen = record(&mut c);
    c.refresh_build_status(&wallet);
    assert!(seen.lock().unwrap().is_empty(), "no selection, no signals");

    assert!(select(&mut c, 0, 0, &wallet));
    seen.lock().unwrap().clear();
    wallet.earn(100);
    c.refresh_build_status(&wallet);
    assert_eq!(
        seen.lock().unwrap().last(),
        Some(&PlacementSignal::CanBuildChanged { can_build: true })
    );
}

#[test]
fn test_information_panels() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(1000, 0);
    place_at(&mut c, 0, 0, &mut wallet).unwrap();
    let seen = record(&mut c);

    c.setup_building_information();
    c.open_upgrade_information();
    c.request_upgrade(&mut wallet).unwrap();
    c.open_current_building_information();
    c.open_upgrade_information();

    let signals = seen.lock().unwrap();
    let infos: Vec<_> = signals
        .iter()
        .filter_map(|s| match s {
            PlacementSignal::BuildingInfoChanged { level, kind } => {
                Some((level.as_ref().map(|l| l.name.clone()), *kind))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        infos,
        vec![
            (Some("Hut".to_string()), InformationType::Current),
            (Some("Cabin".to_string()), InformationType::Upgrade),
            (Some("Cabin".to_string()), InformationType::Current),
            (None, InformationType::None),
        ]
    );
}

#[test]
fn test_information_without_structure_is_silent() {
    let mut c = controller();
    let wallet = CurrencyPortfolio::new(0, 0);
    let seen = record(&mut c);
    c.open_current_building_information();
    assert!(select(&mut c, 1, 1, &wallet));
    seen.lock().unwrap().clear();
    c.open_upgrade_information();
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_grid_listener_sees_removal() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(1000, 0);
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    c.grid_mut()
        .subscribe(move |change| sink.lock().unwrap().push(change.structure.is_some()));

    place_at(&mut c, 1, 1, &mut wallet).unwrap();
    c.request_upgrade(&mut wallet).unwrap();
    c.delete_selected(&mut wallet).unwrap();

    assert_eq!(*changes.lock().unwrap(), vec![true, true, false]);
}

#[test]
fn test_debug_label_and_animation_requests() {
    let mut c = controller();
    let mut wallet = CurrencyPortfolio::new(1000, 0);
    let id = place_at(&mut c, 1, 2, &mut wallet).unwrap();
    c.request_upgrade(&mut wallet).unwrap();

    assert_eq!(c.debug_label(IVec2::new(1, 2)).as_deref(), Some("1, 2\nCabin"));
    assert_eq!(c.debug_label(IVec2::new(0, 0)).as_deref(), Some("0, 0"));
    assert_eq!(c.debug_label(IVec2::new(9, 9)), None);

    assert_eq!(c.drain_animation_requests(), vec![id, id]);
    assert!(c.drain_animation_requests().is_empty());
}

#[test]
fn test_from_settings_requires_four_markers() {
    let mut settings = GameSettings::default();
    let c = PlacementController::from_settings(&settings, test_catalog(), AllBuildable).unwrap();
    assert_eq!((c.grid().width(), c.grid().height()), (10, 10));

    settings.boundary_markers.pop();
    let err = PlacementController::from_settings(&settings, test_catalog(), AllBuildable).unwrap_err();
    assert_eq!(err, GridError::NotEnoughBoundaryMarkers { found: 3 });
}

#[test]
fn test_huge_footprints_never_reach_the_grid() {
    let json = r#"[
        { "base": { "name": "Hut", "cost": 100 } },
        { "base": { "name": "Sprawl", "cost": 100 }, "width": 70000, "height": 70000 }
    ]"#;
    assert!(matches!(
        BuildingCatalog::from_json(json),
        Err(CatalogError::InvalidFootprint { width: 70000, .. })
    ));

    // The widest allowed entry overhangs the 5x5 grid without trouble
    let catalog = BuildingCatalog::new(vec![
        CatalogEntry::new(level("Hut", 100, 0, 0), 1, 1),
        CatalogEntry::new(level("Wall", 100, 0, 0), 10, 10),
    ])
    .unwrap();
    let grid = SpatialGrid::new(5, 5, 2.0, Vec2::ZERO, GridCell::new).unwrap();
    let mut c = PlacementController::new(grid, catalog, AllBuildable);
    let wallet = CurrencyPortfolio::new(1000, 0);

    assert!(select(&mut c, 0, 0, &wallet));
    c.change_selected_entry(true, &wallet);
    assert_eq!(c.selected_entry().name(), "Wall");
    assert_eq!(
        c.check_footprint(IVec2::ZERO, c.selected_entry()),
        Err(PlacementError::OutOfBounds)
    );
}

#[test]
fn test_from_settings_rejects_oversized_grid() {
    let settings = GameSettings {
        cell_size: 0.01,
        boundary_markers: vec![
            Vec2::new(-1.0e6, 1.0e6),
            Vec2::new(1.0e6, 1.0e6),
            Vec2::new(-1.0e6, -1.0e6),
            Vec2::new(1.0e6, -1.0e6),
        ],
        ..Default::default()
    };
    let err = PlacementController::from_settings(&settings, test_catalog(), AllBuildable).unwrap_err();
    assert!(matches!(err, GridError::TooLarge { .. }));
}

#[test]
fn test_error_classification() {
    assert!(PlacementError::Occupied.is_domain_rejection());
    assert!(!PlacementError::NothingSelected.is_domain_rejection());
    assert_eq!(
        PlacementError::InsufficientFunds {
            cost: 80,
            balance: 50
        }
        .to_string(),
        "Not enough money: costs 80, have 50"
    );
    let wallet = CurrencyPortfolio::new(5, 0);
    assert!(!wallet.can_afford(6));
}
