//! The four states of the turn cycle.

use bevy::prelude::*;

use crate::currency::Treasury;
use crate::state_machine::{Flow, State};

use super::action_card::adjusted_money_per_round;
use super::context::TurnContext;
use super::references::{BuildingLevelsPair, ResumeReport, TurnSignal};

/// Pays out the round and opens the resume popup.
#[derive(Debug, Default)]
pub struct ResumeState;

impl ResumeState {
    fn build_report(ctx: &mut TurnContext) -> ResumeReport {
        let refs = &mut ctx.references;
        let round_satisfaction = match refs.action_card.take() {
            Some(card) => {
                refs.money_per_round =
                    adjusted_money_per_round(refs.money_per_round, card.money_difference);
                debug!(
                    "Card '{}' applied: money per round now {}",
                    card.name, refs.money_per_round
                );
                card.satisfaction_percentage_difference
            }
            None => refs.starting_satisfaction,
        };

        let registry = ctx.placement.grid().registry();
        let catalog = ctx.placement.catalog();
        let buildings = registry
            .entries()
            .into_iter()
            .filter_map(|(_, level)| {
                catalog
                    .all_levels_of(level)
                    .map(|levels| BuildingLevelsPair {
                        levels,
                        current: level.clone(),
                    })
            })
            .collect();

        let totals = registry.total_modifiers();
        ResumeReport {
            turn: refs.current_turn() + 1,
            buildings,
            round_money: refs.money_per_round,
            round_satisfaction,
            total_earned: refs.money_per_round + totals.income,
            total_satisfaction: round_satisfaction + totals.satisfaction_increase,
        }
    }
}

impl State<TurnContext> for ResumeState {
    fn on_enter(&mut self, ctx: &mut TurnContext) -> Flow {
        let report = Self::build_report(ctx);

        ctx.portfolio.earn(report.total_earned);
        ctx.portfolio.change_satisfaction(report.total_satisfaction);
        ctx.references.increase_turn();
        ctx.placement.refresh_build_status(&ctx.portfolio);

        info!(
            "Turn {} resume: earned {}, satisfaction {:+}",
            report.turn, report.total_earned, report.total_satisfaction
        );
        ctx.references.emit(TurnSignal::ResumeOpened { report });
        Flow::Continue
    }

    fn on_exit(&mut self, ctx: &mut TurnContext) {
        ctx.references.emit(TurnSignal::ResumeClosed);
        ctx.references.resume_button_pressed = false;
    }
}

/// Waits for an action card to be chosen.
#[derive(Debug, Default)]
pub struct ActionState;

impl State<TurnContext> for ActionState {
    fn on_enter(&mut self, ctx: &mut TurnContext) -> Flow {
        ctx.references.emit(TurnSignal::ActionPopupOpened);
        Flow::Continue
    }

    fn on_exit(&mut self, ctx: &mut TurnContext) {
        ctx.references.emit(TurnSignal::ActionPopupClosed);
    }
}

/// Free building until the next-turn button is pressed.
#[derive(Debug, Default)]
pub struct BuildState;

impl State<TurnContext> for BuildState {
    fn on_enter(&mut self, ctx: &mut TurnContext) -> Flow {
        let turn = ctx.references.current_turn();
        ctx.references.emit(TurnSignal::NextTurnPanelOpened);
        ctx.references.emit(TurnSignal::TurnStarted { turn });
        Flow::Continue
    }

    fn tick(&mut self, ctx: &mut TurnContext) {
        if !ctx.pointer.tapped || ctx.buttons.panels().info_panel_open() {
            return;
        }
        let selected = ctx.placement.select_cell(&ctx.pointer, &ctx.portfolio);
        if selected && !ctx.references.has_clicked_on_grid_initially {
            ctx.references.has_clicked_on_grid_initially = true;
        }
    }

    fn on_exit(&mut self, ctx: &mut TurnContext) {
        ctx.references.emit(TurnSignal::NextTurnPanelClosed);
        ctx.placement.reset_selected_cell();
        ctx.references.next_turn_button_pressed = false;
    }
}

/// Final screen. Nothing leaves this state.
#[derive(Debug, Default)]
pub struct GameOverState;

impl State<TurnContext> for GameOverState {
    fn on_enter(&mut self, ctx: &mut TurnContext) -> Flow {
        let money = ctx.portfolio.money();
        let satisfaction = ctx.portfolio.satisfaction();
        let buildings = ctx.placement.structures().len();
        let summary = format!(
            "After {} turns the town holds {} buildings, {} money and {}% satisfaction.",
            ctx.references.current_turn(),
            buildings,
            money,
            satisfaction
        );
        info!("Game over: {summary}");
        ctx.references.emit(TurnSignal::GameOver {
            money,
            satisfaction,
            summary,
        });
        Flow::Continue
    }
}
