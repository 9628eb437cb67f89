use bevy::prelude::*;

use crate::buttons::ButtonType;
use crate::catalog::BuildingCatalog;
use crate::config::GameSettings;
use crate::currency::Treasury;
use crate::grid::GridError;
use crate::placement::PlacementError;
use crate::pointer::PointerState;
use crate::state_machine::{StateId, StateMachine};
use crate::terrain::BuildableGround;
use crate::tutorial::{self, TutorialContext, TutorialSignal};

use super::context::{TurnContext, TurnPhase};
use super::states::{ActionState, BuildState, GameOverState, ResumeState};

/// Owns the turn cycle, the tutorial overlay and everything they drive.
///
/// Each frame [`TurnBasedBrain::tick`] runs the turn cycle first and the
/// tutorial second, so the tutorial always sees this frame's phase.
#[derive(Resource, Debug)]
pub struct TurnBasedBrain {
    context: TurnContext,
    machine: StateMachine<TurnContext>,
    resume: StateId,
    action: StateId,
    build: StateId,
    game_over: StateId,
    tutorial: StateMachine<TutorialContext>,
    tutorial_context: TutorialContext,
}

impl TurnBasedBrain {
    pub fn new(
        settings: &GameSettings,
        catalog: BuildingCatalog,
        ground: impl BuildableGround + 'static,
    ) -> Result<Self, GridError> {
        let mut context = TurnContext::new(settings, catalog, ground)?;

        let mut machine = StateMachine::new();
        let resume = machine.add_state(ResumeState);
        let action = machine.add_state(ActionState);
        let build = machine.add_state(BuildState);
        let game_over = machine.add_state(GameOverState);

        machine.add_transition(resume, action, |c: &TurnContext| {
            c.references.resume_button_pressed && !c.references.is_last_turn()
        });
        machine.add_transition(action, build, |c: &TurnContext| {
            c.references.action_card.is_some()
        });
        machine.add_transition(build, resume, |c: &TurnContext| {
            c.references.next_turn_button_pressed && !c.references.is_last_turn()
        });
        machine.add_transition(resume, build, |c: &TurnContext| {
            c.references.resume_button_pressed && c.references.is_last_turn()
        });
        machine.add_transition(build, game_over, |c: &TurnContext| {
            c.references.next_turn_button_pressed && c.references.is_last_turn()
        });

        let (tutorial, tutorial_start) = tutorial::build_tutorial(&mut context.buttons);
        let mut brain = Self {
            context,
            machine,
            resume,
            action,
            build,
            game_over,
            tutorial,
            tutorial_context: TutorialContext::default(),
        };

        brain.machine.set_state(brain.resume, &mut brain.context);
        brain.observe_for_tutorial();
        brain
            .tutorial
            .set_state(tutorial_start, &mut brain.tutorial_context);
        Ok(brain)
    }

    pub fn tick(&mut self) {
        self.machine.tick(&mut self.context);
        self.observe_for_tutorial();
        self.tutorial.tick(&mut self.tutorial_context);
    }

    fn observe_for_tutorial(&mut self) {
        let phase = self.phase();
        self.tutorial_context
            .observe(phase, &self.context.references, &self.context.pointer);
    }

    /// The turn-cycle state currently active.
    pub fn phase(&self) -> TurnPhase {
        match self.machine.current() {
            Some(id) if id == self.action => TurnPhase::Action,
            Some(id) if id == self.build => TurnPhase::Build,
            Some(id) if id == self.game_over => TurnPhase::GameOver,
            _ => TurnPhase::Resume,
        }
    }

    // -------------------------------------------------------------------------
    // Player input
    // -------------------------------------------------------------------------

    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.context.pointer = pointer;
    }

    /// Close the resume popup. Takes effect on the next tick.
    pub fn press_resume(&mut self) {
        self.context.references.resume_button_pressed = true;
    }

    pub fn press_next_turn(&mut self) {
        self.context.references.next_turn_button_pressed = true;
    }

    /// Pick a card from the deck. Only valid while the action popup is open.
    pub fn choose_card(&mut self, index: usize) -> Result<(), &'static str> {
        if self.phase() != TurnPhase::Action {
            return Err("Cards can only be chosen during the action phase");
        }
        let card = self
            .context
            .references
            .action_deck
            .get(index)
            .cloned()
            .ok_or("No action card with that index")?;
        info!("Action card chosen: {}", card.name);
        self.context.references.action_card = Some(card);
        Ok(())
    }

    /// Press a world-space button. Only the build phase shows them.
    pub fn press_button(&mut self, button: ButtonType) -> Result<(), PlacementError> {
        if self.phase() != TurnPhase::Build {
            warn!("Ignoring {button:?} outside the build phase");
            return Ok(());
        }
        let ctx = &mut self.context;
        let balance = ctx.portfolio.balance();
        let result = ctx
            .buttons
            .press(button, &mut ctx.placement, &mut ctx.portfolio);
        if ctx.portfolio.balance() != balance {
            ctx.placement.refresh_build_status(&ctx.portfolio);
        }
        if let Err(e) = &result {
            if e.is_domain_rejection() {
                info!("{button:?} rejected: {e}");
            } else {
                error!("{button:?} failed: {e}");
            }
        }
        result
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut TurnContext {
        &mut self.context
    }

    pub fn is_tutorial_running(&self) -> bool {
        self.tutorial.is_running()
    }

    /// Transitions left in the tutorial machine; zero once it has shut down.
    pub fn tutorial_transition_count(&self) -> usize {
        self.tutorial.transition_count()
    }

    pub fn tutorial_state_name(&self) -> Option<String> {
        self.tutorial.current_state_name()
    }

    pub fn current_hint(&self) -> Option<usize> {
        self.tutorial_context.current_hint()
    }

    pub fn drain_tutorial_signals(&mut self) -> Vec<TutorialSignal> {
        self.tutorial_context.drain_signals()
    }
}
