use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::buttons::{ButtonType, WorldButtons};
use crate::state_machine::{Flow, State};

use super::TutorialContext;

/// Shows one hint while current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingState {
    pub hint: usize,
}

impl PingState {
    pub fn new(hint: usize) -> Self {
        Self { hint }
    }
}

impl State<TutorialContext> for PingState {
    fn on_enter(&mut self, ctx: &mut TutorialContext) -> Flow {
        ctx.show_hint(self.hint);
        Flow::Continue
    }

    fn name(&self) -> String {
        format!("PingState({})", self.hint)
    }
}

/// A hint pointing at a button. The step is done once that button is pressed.
#[derive(Debug)]
pub struct ButtonPingState {
    pub hint: usize,
    pub button: ButtonType,
    pressed: Arc<AtomicBool>,
}

impl ButtonPingState {
    /// Registers the first-click latch immediately.
    pub fn new(buttons: &mut WorldButtons, button: ButtonType, hint: usize) -> Self {
        Self {
            hint,
            button,
            pressed: buttons.first_click_latch(button),
        }
    }

    /// Shared flag, for use in transition guards.
    pub fn latch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pressed)
    }

    pub fn was_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }
}

impl State<TutorialContext> for ButtonPingState {
    fn on_enter(&mut self, ctx: &mut TutorialContext) -> Flow {
        ctx.show_hint(self.hint);
        Flow::Continue
    }

    fn name(&self) -> String {
        format!("ButtonPingState({})", self.hint)
    }
}
