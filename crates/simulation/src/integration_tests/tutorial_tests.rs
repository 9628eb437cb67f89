//! The tutorial overlay running alongside a real game.

use crate::buttons::ButtonType;
use crate::test_harness::TestGame;
use crate::tutorial::HINTS;

#[test]
fn test_tutorial_walkthrough_in_app() {
    let mut game = TestGame::new();
    game.assert_hint(Some(0));

    game.tap_nowhere();
    game.tap_nowhere();
    game.assert_hint(Some(2));

    game.resume();
    game.assert_hint(Some(3));
    game.tap_nowhere();
    game.tap_nowhere();
    game.assert_hint(Some(5));

    game.choose_card(4);
    game.assert_hint(Some(6));

    game.tap_cell(3, 3);
    game.assert_hint(Some(7));

    game.press(ButtonType::OpenBuildingInfo).unwrap();
    game.assert_hint(Some(8));
    game.tap_nowhere();
    game.assert_hint(Some(9));
    game.press(ButtonType::CloseInfo).unwrap();
    game.assert_hint(Some(10));
    game.press(ButtonType::IncrementBuilding).unwrap();
    game.assert_hint(Some(11));
    game.press(ButtonType::DecrementBuilding).unwrap();
    game.press(ButtonType::PlaceBuilding).unwrap();
    game.assert_hint(Some(12));
    game.press(ButtonType::OpenUpgradeInfo).unwrap();
    game.assert_hint(Some(13));
    game.tap_nowhere();
    game.tap_nowhere();
    game.assert_hint(Some(15));

    game.next_turn();
    game.assert_hint(None);
    assert!(!game.brain().is_tutorial_running());
    assert_eq!(game.observation().tutorial_state, None);
}

#[test]
fn test_tutorial_never_blocks_play() {
    let mut game = TestGame::new();
    // Ignore every hint and just play
    game.play_to_build(4);
    game.build_at(2, 2).unwrap();
    game.next_turn();

    game.assert_hint(None);
    assert_eq!(game.turn(), 2);
    game.assert_has_building(2, 2);
}

#[test]
fn test_observation_reports_tutorial_state() {
    let mut game = TestGame::new();
    game.tick(1);
    let obs = game.observation();
    assert_eq!(
        obs.tutorial_state.as_deref(),
        Some("ResumeSubStates/PingState(0)")
    );
    assert_eq!(obs.tutorial_hint, Some(0));
    assert!(!HINTS[0].is_empty());
}
