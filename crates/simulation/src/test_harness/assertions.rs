//! Assertion helpers for `TestGame` integration tests.

use bevy::prelude::*;

use crate::turn_based::TurnPhase;

use super::TestGame;

impl TestGame {
    pub fn assert_phase(&self, expected: TurnPhase) {
        let phase = self.phase();
        assert_eq!(phase, expected, "Expected phase {expected:?}, got {phase:?}");
    }

    pub fn assert_money(&self, expected: i64) {
        let money = self.money();
        assert_eq!(money, expected, "Expected money {expected}, got {money}");
    }

    pub fn assert_satisfaction(&self, expected: i32) {
        let satisfaction = self.satisfaction();
        assert_eq!(
            satisfaction, expected,
            "Expected satisfaction {expected}, got {satisfaction}"
        );
    }

    /// Assert a building sits on the cell.
    pub fn assert_has_building(&self, x: i32, y: i32) {
        let cell = IVec2::new(x, y);
        assert!(
            self.brain().context().placement.structure_at(cell).is_some(),
            "Expected a building at ({x}, {y})"
        );
    }

    pub fn assert_empty_cell(&self, x: i32, y: i32) {
        let cell = IVec2::new(x, y);
        assert!(
            self.brain().context().placement.structure_at(cell).is_none(),
            "Expected no building at ({x}, {y})"
        );
    }

    pub fn assert_hint(&self, expected: Option<usize>) {
        let hint = self.hint();
        assert_eq!(hint, expected, "Expected tutorial hint {expected:?}, got {hint:?}");
    }
}
