//! Builds a `TurnObservation` snapshot from the turn-based brain.
//!
//! `update_current_observation` runs in `Update` right after the brain ticks,
//! so the stored snapshot always reflects the finished frame.

use bevy::core::FrameCount;
use bevy::prelude::*;

use crate::config::SATISFACTION_MAX;
use crate::currency::Treasury;
use crate::turn_based::{TurnBasedBrain, TurnPhase};
use crate::turn_observation::{BuildingSnapshot, PanelSnapshot, TurnObservation, TurnWarning};

/// Satisfaction below this share of the maximum raises a warning.
const LOW_SATISFACTION_FRACTION: i32 = 4;

// ---------------------------------------------------------------------------
// Resource: holds the latest observation
// ---------------------------------------------------------------------------

#[derive(Resource, Default, Debug, Clone)]
pub struct CurrentObservation {
    pub observation: TurnObservation,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub fn build_observation(brain: &TurnBasedBrain, frame: u32) -> TurnObservation {
    let ctx = brain.context();
    let placement = &ctx.placement;
    let grid = placement.grid();
    let panels = ctx.buttons.panels();

    let buildings = grid
        .registry()
        .entries()
        .into_iter()
        .map(|(centroid, level)| BuildingSnapshot {
            centroid,
            name: level.name.clone(),
            income: level.modifiers.income,
            satisfaction: level.modifiers.satisfaction_increase,
        })
        .collect();

    TurnObservation {
        frame,
        phase: brain.phase(),
        turn: ctx.references.current_turn(),
        max_turns: ctx.references.max_turns,

        money: ctx.portfolio.money(),
        satisfaction: ctx.portfolio.satisfaction(),
        money_per_round: ctx.references.money_per_round,

        grid_width: grid.width(),
        grid_height: grid.height(),
        selected_cell: placement.selected_cell(),
        selected_building: placement.selected_entry().name().to_string(),
        structure_count: placement.structures().len(),
        buildings,
        panels: PanelSnapshot {
            build: panels.build_panel_open(),
            upgrade: panels.upgrade_panel_open(),
            info: panels.info_panel_open(),
        },

        tutorial_state: brain.tutorial_state_name(),
        tutorial_hint: brain.current_hint(),

        warnings: compute_warnings(brain),
    }
}

pub fn update_current_observation(
    frame: Res<FrameCount>,
    brain: Option<Res<TurnBasedBrain>>,
    mut current: ResMut<CurrentObservation>,
) {
    let Some(brain) = brain else {
        return;
    };
    current.observation = build_observation(&brain, frame.0);
}

// ---------------------------------------------------------------------------
// Warning detection helpers
// ---------------------------------------------------------------------------

fn compute_warnings(brain: &TurnBasedBrain) -> Vec<TurnWarning> {
    let ctx = brain.context();
    let mut warnings = Vec::new();

    let cheapest = ctx
        .placement
        .catalog()
        .entries()
        .iter()
        .map(|entry| entry.cost())
        .min();
    if cheapest.is_some_and(|cost| !ctx.portfolio.can_afford(cost)) {
        warnings.push(TurnWarning::CannotAffordAnything);
    }

    if ctx.portfolio.satisfaction() < SATISFACTION_MAX / LOW_SATISFACTION_FRACTION {
        warnings.push(TurnWarning::LowSatisfaction);
    }

    if ctx.references.is_last_turn() && brain.phase() != TurnPhase::GameOver {
        warnings.push(TurnWarning::LastTurn);
    }

    warnings
}
