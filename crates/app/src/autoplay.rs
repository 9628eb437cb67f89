//! `--autoplay <seed>`: a seeded random player.
//!
//! Each frame the player looks at the phase and picks one input: dismiss the
//! resume popup, draw a card, or tap and press buttons during the build
//! phase. The same seed always plays the same game.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use simulation::buttons::ButtonType;
use simulation::observation_builder::CurrentObservation;
use simulation::pointer::PointerState;
use simulation::{TurnBasedBrain, TurnPhase};

/// Give up after this many frames even if the game has not ended.
const FRAME_CAP: u32 = 50_000;

/// Chance per build-phase frame of ending the turn.
const NEXT_TURN_CHANCE: f64 = 0.05;

/// Chance per build-phase frame of tapping a cell instead of pressing a button.
const TAP_CHANCE: f64 = 0.5;

pub fn run_autoplay(mut app: App, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!("Autoplay started with seed {seed}");

    let mut frames = 0;
    while frames < FRAME_CAP {
        let Some(phase) = play_frame(&mut app, &mut rng) else {
            error!("Autoplay lost its game");
            return;
        };
        if phase == TurnPhase::GameOver {
            break;
        }
        app.update();
        frames += 1;
    }

    let observation = &app.world().resource::<CurrentObservation>().observation;
    info!(
        "Autoplay finished after {frames} frames: turn {}, {} money, {}% satisfaction, {} buildings",
        observation.turn, observation.money, observation.satisfaction, observation.structure_count
    );
    match serde_json::to_string_pretty(observation) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize the final observation: {e}"),
    }
}

/// Feed one random input for the current phase. Returns the phase it saw.
fn play_frame(app: &mut App, rng: &mut ChaCha8Rng) -> Option<TurnPhase> {
    let world = app.world_mut();
    let mut brain = world.get_resource_mut::<TurnBasedBrain>()?;
    let phase = brain.phase();
    let mut tap = None;

    match phase {
        TurnPhase::Resume => brain.press_resume(),
        TurnPhase::Action => {
            let deck_size = brain.context().references.action_deck.len();
            if deck_size > 0 {
                let index = rng.gen_range(0..deck_size);
                if let Err(e) = brain.choose_card(index) {
                    warn!("Autoplay card {index} refused: {e}");
                }
            }
        }
        TurnPhase::Build => {
            if rng.gen_bool(NEXT_TURN_CHANCE) {
                brain.press_next_turn();
            } else if rng.gen_bool(TAP_CHANCE) {
                let grid = brain.context().placement.grid();
                let cell = IVec2::new(
                    rng.gen_range(0..grid.width()),
                    rng.gen_range(0..grid.height()),
                );
                tap = Some(grid.cell_center_world(cell));
            } else if let Some(&button) = ButtonType::ALL.choose(rng) {
                // Rejections are logged by the brain
                let _ = brain.press_button(button);
            }
        }
        TurnPhase::GameOver => {}
    }

    if let Some(position) = tap {
        *world.resource_mut::<PointerState>() = PointerState::tap_at(position);
    }
    Some(phase)
}
