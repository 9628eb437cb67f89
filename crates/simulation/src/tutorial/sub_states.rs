use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;

use crate::buttons::{ButtonType, WorldButtons};
use crate::state_machine::{Flow, State, StateId, StateMachine};

use super::ping::{ButtonPingState, PingState};
use super::TutorialContext;

/// A tutorial step that runs its own private machine while current.
pub struct SubStates {
    label: &'static str,
    machine: Option<StateMachine<TutorialContext>>,
    start: StateId,
    hide_hint_on_exit: bool,
}

impl std::fmt::Debug for SubStates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubStates")
            .field("label", &self.label)
            .field("machine", &self.machine)
            .finish()
    }
}

impl SubStates {
    fn new(label: &'static str, machine: StateMachine<TutorialContext>, start: StateId) -> Self {
        Self {
            label,
            machine: Some(machine),
            start,
            hide_hint_on_exit: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn inner_state_name(&self) -> Option<String> {
        self.machine.as_ref()?.current_state_name()
    }
}

impl State<TutorialContext> for SubStates {
    fn on_enter(&mut self, ctx: &mut TutorialContext) -> Flow {
        match self.machine.as_mut() {
            Some(machine) => machine.set_state(self.start, ctx),
            None => warn!("{} entered again after shutting down", self.label),
        }
        Flow::Continue
    }

    fn tick(&mut self, ctx: &mut TutorialContext) {
        if let Some(machine) = self.machine.as_mut() {
            machine.tick(ctx);
        }
    }

    fn on_exit(&mut self, ctx: &mut TutorialContext) {
        if let Some(mut machine) = self.machine.take() {
            machine.shutdown();
        }
        if self.hide_hint_on_exit {
            ctx.hide_hint();
        }
    }

    fn name(&self) -> String {
        match self.inner_state_name() {
            Some(inner) => format!("{}/{}", self.label, inner),
            None => self.label.to_string(),
        }
    }
}

fn tapped(c: &TutorialContext) -> bool {
    c.tapped
}

fn latched(latch: &Arc<AtomicBool>) -> impl Fn(&TutorialContext) -> bool + Send + Sync + 'static {
    let latch = Arc::clone(latch);
    move |_: &TutorialContext| latch.load(Ordering::Relaxed)
}

/// Three pings, each advanced by a tap.
fn tap_chain(label: &'static str, hints: [usize; 3]) -> SubStates {
    let mut machine = StateMachine::new();
    let ids = hints.map(|hint| machine.add_state(PingState::new(hint)));
    machine.add_transition(ids[0], ids[1], tapped);
    machine.add_transition(ids[1], ids[2], tapped);
    SubStates::new(label, machine, ids[0])
}

pub fn resume_sub_states() -> SubStates {
    tap_chain("ResumeSubStates", [0, 1, 2])
}

pub fn action_sub_states() -> SubStates {
    tap_chain("ActionSubStates", [3, 4, 5])
}

/// Walk through selecting, inspecting, placing and upgrading a building.
pub fn build_sub_states(buttons: &mut WorldButtons) -> SubStates {
    let mut machine = StateMachine::new();

    let open_info = ButtonPingState::new(buttons, ButtonType::OpenBuildingInfo, 7);
    let close_info = ButtonPingState::new(buttons, ButtonType::CloseInfo, 9);
    let browse = ButtonPingState::new(buttons, ButtonType::IncrementBuilding, 10);
    let place = ButtonPingState::new(buttons, ButtonType::PlaceBuilding, 11);
    let upgrade_info = ButtonPingState::new(buttons, ButtonType::OpenUpgradeInfo, 12);
    let close_upgrade_info = ButtonPingState::new(buttons, ButtonType::CloseInfo, 14);

    let open_info_pressed = open_info.latch();
    let close_info_pressed = close_info.latch();
    let browse_pressed = browse.latch();
    let place_pressed = place.latch();
    let upgrade_info_pressed = upgrade_info.latch();

    let tap_grid = machine.add_state(PingState::new(6));
    let open_info = machine.add_state(open_info);
    let explain = machine.add_state(PingState::new(8));
    let close_info = machine.add_state(close_info);
    let browse = machine.add_state(browse);
    let place = machine.add_state(place);
    let upgrade_info = machine.add_state(upgrade_info);
    let explain_upgrade = machine.add_state(PingState::new(13));
    let close_upgrade_info = machine.add_state(close_upgrade_info);
    let done = machine.add_state(PingState::new(15));

    machine.add_transition(tap_grid, open_info, |c: &TutorialContext| {
        c.has_clicked_on_grid_initially
    });
    machine.add_transition(open_info, explain, latched(&open_info_pressed));
    machine.add_transition(explain, close_info, tapped);
    machine.add_transition(close_info, browse, latched(&close_info_pressed));
    machine.add_transition(browse, place, latched(&browse_pressed));
    machine.add_transition(place, upgrade_info, latched(&place_pressed));
    machine.add_transition(upgrade_info, explain_upgrade, latched(&upgrade_info_pressed));
    machine.add_transition(explain_upgrade, close_upgrade_info, tapped);
    machine.add_transition(close_upgrade_info, done, tapped);

    // Players who skip ahead jump to the step they reached
    machine.add_transition(open_info, place, latched(&browse_pressed));
    machine.add_transition(open_info, upgrade_info, latched(&place_pressed));
    machine.add_transition(browse, upgrade_info, latched(&place_pressed));

    let mut sub = SubStates::new("BuildSubStates", machine, tap_grid);
    sub.hide_hint_on_exit = true;
    sub
}
