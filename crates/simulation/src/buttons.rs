//! World-space building buttons and the panels they toggle.
//!
//! Each [`ButtonType`] maps to one placement command. Buttons also accept
//! first-click callbacks: one-shot hooks that fire on the next press and are
//! then dropped, used by the tutorial to notice a button being discovered.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::currency::Treasury;
use crate::listeners::ListenerId;
use crate::placement::{PlacementController, PlacementError, PlacementSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
    PlaceBuilding,
    CloseBuildingCanvas,
    IncrementBuilding,
    DecrementBuilding,
    OpenBuildingInfo,
    SellBuilding,
    UpgradeBuilding,
    OpenCurrentInfo,
    OpenUpgradeInfo,
    CloseInfo,
    CloseUpgradeCanvas,
}

impl ButtonType {
    pub const ALL: [ButtonType; 11] = [
        ButtonType::PlaceBuilding,
        ButtonType::CloseBuildingCanvas,
        ButtonType::IncrementBuilding,
        ButtonType::DecrementBuilding,
        ButtonType::OpenBuildingInfo,
        ButtonType::SellBuilding,
        ButtonType::UpgradeBuilding,
        ButtonType::OpenCurrentInfo,
        ButtonType::OpenUpgradeInfo,
        ButtonType::CloseInfo,
        ButtonType::CloseUpgradeCanvas,
    ];
}

/// Visibility of the placement panels, driven by placement signals.
#[derive(Debug, Default)]
pub struct UiPanels {
    build: AtomicBool,
    upgrade: AtomicBool,
    info: AtomicBool,
}

impl UiPanels {
    pub fn apply(&self, signal: &PlacementSignal) {
        match signal {
            PlacementSignal::BuildPanelOpened { .. } => {
                self.build.store(true, Ordering::Relaxed);
            }
            PlacementSignal::UpgradePanelOpened { .. } => {
                self.build.store(false, Ordering::Relaxed);
                self.upgrade.store(true, Ordering::Relaxed);
            }
            PlacementSignal::StoppedBuilding => {
                self.build.store(false, Ordering::Relaxed);
                self.upgrade.store(false, Ordering::Relaxed);
                self.info.store(false, Ordering::Relaxed);
            }
            PlacementSignal::BuildingInfoChanged { .. } => {
                self.info.store(true, Ordering::Relaxed);
            }
            PlacementSignal::SelectionChanged { .. }
            | PlacementSignal::CanBuildChanged { .. }
            | PlacementSignal::MoneyChanged { .. } => {}
        }
    }

    pub fn close_info(&self) {
        self.info.store(false, Ordering::Relaxed);
    }

    pub fn build_panel_open(&self) -> bool {
        self.build.load(Ordering::Relaxed)
    }

    pub fn upgrade_panel_open(&self) -> bool {
        self.upgrade.load(Ordering::Relaxed)
    }

    pub fn info_panel_open(&self) -> bool {
        self.info.load(Ordering::Relaxed)
    }
}

type FirstClick = Box<dyn FnOnce() + Send + Sync>;

#[derive(Default)]
pub struct WorldButtons {
    first_click: HashMap<ButtonType, Vec<FirstClick>>,
    panels: Arc<UiPanels>,
}

impl std::fmt::Debug for WorldButtons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldButtons")
            .field("pending_first_clicks", &self.pending_first_clicks())
            .field("panels", &self.panels)
            .finish()
    }
}

impl WorldButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the panel flags in sync with `placement`.
    pub fn attach(&self, placement: &mut PlacementController) -> ListenerId {
        let panels = Arc::clone(&self.panels);
        placement.subscribe(move |signal| panels.apply(signal))
    }

    pub fn panels(&self) -> &UiPanels {
        &self.panels
    }

    pub fn add_first_click_callback(
        &mut self,
        button: ButtonType,
        callback: impl FnOnce() + Send + Sync + 'static,
    ) {
        self.first_click
            .entry(button)
            .or_default()
            .push(Box::new(callback));
    }

    /// Flag that flips to true on the next press of `button` and stays set.
    pub fn first_click_latch(&mut self, button: ButtonType) -> Arc<AtomicBool> {
        let latch = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&latch);
        self.add_first_click_callback(button, move || flag.store(true, Ordering::Relaxed));
        latch
    }

    pub fn pending_first_clicks(&self) -> usize {
        self.first_click.values().map(Vec::len).sum()
    }

    /// Fire pending first-click callbacks, then run the button's command.
    pub fn press(
        &mut self,
        button: ButtonType,
        placement: &mut PlacementController,
        treasury: &mut dyn Treasury,
    ) -> Result<(), PlacementError> {
        if let Some(callbacks) = self.first_click.remove(&button) {
            for callback in callbacks {
                callback();
            }
        }

        match button {
            ButtonType::PlaceBuilding => placement.place_selected(treasury).map(|_| ()),
            ButtonType::CloseBuildingCanvas | ButtonType::CloseUpgradeCanvas => {
                placement.reset_selected_cell();
                Ok(())
            }
            ButtonType::IncrementBuilding => {
                placement.change_selected_entry(true, &*treasury);
                Ok(())
            }
            ButtonType::DecrementBuilding => {
                placement.change_selected_entry(false, &*treasury);
                Ok(())
            }
            ButtonType::OpenBuildingInfo => {
                placement.setup_building_information();
                Ok(())
            }
            ButtonType::SellBuilding => {
                let sold = placement.delete_selected(treasury).map(|_| ());
                placement.reset_selected_cell();
                sold
            }
            ButtonType::UpgradeBuilding => placement.request_upgrade(treasury).map(|_| ()),
            ButtonType::OpenCurrentInfo => {
                placement.open_current_building_information();
                Ok(())
            }
            ButtonType::OpenUpgradeInfo => {
                placement.open_upgrade_information();
                Ok(())
            }
            ButtonType::CloseInfo => {
                self.panels.close_info();
                Ok(())
            }
        }
    }
}
