//! First-turn tutorial overlay.
//!
//! A second state machine that watches the turn cycle and shows numbered hints.
//! It only reads a per-frame [`TutorialContext`] snapshot and talks back
//! through the context's outbox. It never drives the turn cycle.

mod ping;
mod sub_states;

pub use ping::{ButtonPingState, PingState};
pub use sub_states::{action_sub_states, build_sub_states, resume_sub_states, SubStates};

use bevy::prelude::*;
use serde::Serialize;

use crate::buttons::WorldButtons;
use crate::pointer::PointerState;
use crate::state_machine::{Flow, State, StateId, StateMachine};
use crate::turn_based::{TurnPhase, TurnReferences};

/// Hint texts, indexed by the number a ping state shows.
pub const HINTS: [&str; 16] = [
    "Welcome, Mayor! Every turn starts with a summary of what your town earned.",
    "Money comes from the round budget plus the income of every building.",
    "Satisfaction rises and falls with your choices. Tap to continue.",
    "Pick an action card. It changes next round's budget and satisfaction.",
    "Cards that raise money usually cost satisfaction, and the other way round.",
    "Choose one card to move on to building.",
    "Tap an empty spot on the grid to start building.",
    "Open the building info to see what this building does.",
    "Each building adds income and satisfaction every turn.",
    "Close the info panel when you are done reading.",
    "Use the arrows to browse the other buildings.",
    "Place the building on the grid.",
    "Open the upgrade info to see what the next level gives.",
    "Upgrades cost money but improve the building's modifiers.",
    "Close the info panel to keep building.",
    "Press next turn whenever you are ready. Good luck!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", content = "hint", rename_all = "snake_case")]
pub enum TutorialSignal {
    ShowHint(usize),
    HideHint,
}

/// Read-only view of the turn cycle for one frame, plus the hint outbox.
#[derive(Debug, Clone, Default)]
pub struct TutorialContext {
    pub phase: TurnPhase,
    pub is_first_turn: bool,
    pub tapped: bool,
    pub has_clicked_on_grid_initially: bool,
    outbox: Vec<TutorialSignal>,
    current_hint: Option<usize>,
}

impl TutorialContext {
    /// Copy this frame's observation. The outbox and current hint are kept.
    pub fn observe(&mut self, phase: TurnPhase, references: &TurnReferences, pointer: &PointerState) {
        self.phase = phase;
        self.is_first_turn = references.is_first_turn();
        self.tapped = pointer.tapped;
        self.has_clicked_on_grid_initially = references.has_clicked_on_grid_initially;
    }

    pub fn show_hint(&mut self, index: usize) {
        self.current_hint = Some(index);
        self.outbox.push(TutorialSignal::ShowHint(index));
    }

    pub fn hide_hint(&mut self) {
        self.current_hint = None;
        self.outbox.push(TutorialSignal::HideHint);
    }

    pub fn current_hint(&self) -> Option<usize> {
        self.current_hint
    }

    pub fn drain_signals(&mut self) -> Vec<TutorialSignal> {
        std::mem::take(&mut self.outbox)
    }
}

/// Terminal state. Entering it stops the tutorial for good.
#[derive(Debug, Default)]
pub struct EmptyEnd;

impl State<TutorialContext> for EmptyEnd {
    fn on_enter(&mut self, _ctx: &mut TutorialContext) -> Flow {
        info!("Tutorial finished");
        Flow::Shutdown
    }
}

/// Assemble the tutorial machine. Returns it with its start state; the caller
/// enters that state once the turn cycle is running.
///
/// Button latches are registered on `buttons` here, so presses made before a
/// step is reached still count for it.
pub fn build_tutorial(buttons: &mut WorldButtons) -> (StateMachine<TutorialContext>, StateId) {
    let mut machine = StateMachine::new();
    let resume = machine.add_state(resume_sub_states());
    let action = machine.add_state(action_sub_states());
    let build = machine.add_state(build_sub_states(buttons));
    let end = machine.add_state(EmptyEnd);

    machine.add_transition(resume, action, |c: &TutorialContext| {
        c.is_first_turn && c.phase == TurnPhase::Action
    });
    machine.add_transition(action, build, |c: &TutorialContext| {
        c.is_first_turn && c.phase == TurnPhase::Build
    });
    machine.add_transition(build, end, |c: &TutorialContext| !c.is_first_turn);

    (machine, resume)
}
