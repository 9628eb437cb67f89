//! Generic guarded-transition state machine.
//!
//! States are stored in the machine and addressed by [`StateId`]. Every state
//! hook receives the machine's context `C` mutably, so states carry no
//! back-references to the objects they drive. Guards only read the context.
//!
//! Per [`StateMachine::tick`], while a state is current: any-source
//! transitions are checked first, then the transitions leaving the current
//! state, both in insertion order. The first guard that returns true fires
//! (exit old, enter new) and the new state is ticked in the same call. At
//! most one transition fires per tick.

use std::collections::HashMap;

use bevy::prelude::*;

/// Handle to a state registered with [`StateMachine::add_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What the machine should do after a state's `on_enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Tear the machine down: no current state, no transitions, no further ticks.
    Shutdown,
}

pub trait State<C>: Send + Sync {
    fn on_enter(&mut self, _ctx: &mut C) -> Flow {
        Flow::Continue
    }

    fn tick(&mut self, _ctx: &mut C) {}

    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Display name, the bare type name unless overridden.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

type Guard<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

struct Transition<C> {
    to: StateId,
    guard: Guard<C>,
}

pub struct StateMachine<C> {
    states: Vec<Box<dyn State<C>>>,
    current: Option<StateId>,
    transitions: HashMap<StateId, Vec<Transition<C>>>,
    any_transitions: Vec<Transition<C>>,
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            current: None,
            transitions: HashMap::new(),
            any_transitions: Vec::new(),
        }
    }
}

impl<C> std::fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states.len())
            .field("current", &self.current_state_name())
            .field("transitions", &self.transition_count())
            .finish()
    }
}

impl<C> StateMachine<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: impl State<C> + 'static) -> StateId {
        self.states.push(Box::new(state));
        StateId(self.states.len() - 1)
    }

    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        guard: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) {
        self.transitions.entry(from).or_default().push(Transition {
            to,
            guard: Box::new(guard),
        });
    }

    /// Transition checked from every state, ahead of source-specific ones.
    pub fn add_any_transition(
        &mut self,
        to: StateId,
        guard: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) {
        self.any_transitions.push(Transition {
            to,
            guard: Box::new(guard),
        });
    }

    /// Switch to `id`. Re-selecting the current state does nothing.
    pub fn set_state(&mut self, id: StateId, ctx: &mut C) {
        if self.current == Some(id) {
            return;
        }
        if id.0 >= self.states.len() {
            error!("State machine has no state with index {}", id.0);
            return;
        }

        if let Some(old) = self.current {
            self.states[old.0].on_exit(ctx);
        }
        self.current = Some(id);

        if self.states[id.0].on_enter(ctx) == Flow::Shutdown {
            self.shutdown();
        }
    }

    pub fn tick(&mut self, ctx: &mut C) {
        if let Some(next) = self.next_transition(ctx) {
            self.set_state(next, ctx);
        }
        if let Some(id) = self.current {
            self.states[id.0].tick(ctx);
        }
    }

    fn next_transition(&self, ctx: &C) -> Option<StateId> {
        let current = self.current?;
        if let Some(t) = self.any_transitions.iter().find(|t| (t.guard)(ctx)) {
            return Some(t.to);
        }
        self.transitions
            .get(&current)?
            .iter()
            .find(|t| (t.guard)(ctx))
            .map(|t| t.to)
    }

    /// Drop the current state and every transition. Exit hooks are not run.
    pub fn shutdown(&mut self) {
        self.current = None;
        self.transitions.clear();
        self.any_transitions.clear();
    }

    pub fn is_current_state(&self, id: StateId) -> bool {
        self.current == Some(id)
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_state_name(&self) -> Option<String> {
        self.current.map(|id| self.states[id.0].name())
    }

    pub fn state(&self, id: StateId) -> Option<&dyn State<C>> {
        self.states.get(id.0).map(|s| s.as_ref())
    }

    /// Total number of registered transitions, any-source included.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum::<usize>() + self.any_transitions.len()
    }
}
