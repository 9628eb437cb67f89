//! Money and satisfaction bookkeeping.

use crate::config::{REFUND_DIVISOR, SATISFACTION_MAX, SATISFACTION_MIN};
use crate::listeners::Listeners;
use bevy::prelude::*;

/// Money source passed to placement and turn logic.
pub trait Treasury {
    fn balance(&self) -> i64;

    fn can_afford(&self, cost: u32) -> bool {
        self.balance() >= i64::from(cost)
    }

    /// Deduct `cost`. Refuses and returns false when the balance is short.
    fn spend(&mut self, cost: u32) -> bool;

    fn earn(&mut self, amount: i64);
}

/// Amount returned when a building of the given level cost is sold.
pub fn refund_for(cost: u32) -> u32 {
    cost / REFUND_DIVISOR
}

#[derive(Debug, Default)]
pub struct CurrencyPortfolio {
    money: i64,
    satisfaction: i32,
    pub money_changed: Listeners<i64>,
    pub satisfaction_changed: Listeners<i32>,
}

impl CurrencyPortfolio {
    pub fn new(money: i64, satisfaction: i32) -> Self {
        Self {
            money,
            satisfaction: satisfaction.clamp(SATISFACTION_MIN, SATISFACTION_MAX),
            ..Default::default()
        }
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn satisfaction(&self) -> i32 {
        self.satisfaction
    }

    /// Apply `delta` percentage points, clamped to 0..=100.
    pub fn change_satisfaction(&mut self, delta: i32) {
        self.satisfaction = self
            .satisfaction
            .saturating_add(delta)
            .clamp(SATISFACTION_MIN, SATISFACTION_MAX);
        self.satisfaction_changed.emit(&self.satisfaction);
    }
}

impl Treasury for CurrencyPortfolio {
    fn balance(&self) -> i64 {
        self.money
    }

    fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            error!(
                "Refusing to spend {cost} with a balance of {}",
                self.money
            );
            return false;
        }
        self.money -= i64::from(cost);
        self.money_changed.emit(&self.money);
        true
    }

    fn earn(&mut self, amount: i64) {
        self.money += amount;
        self.money_changed.emit(&self.money);
    }
}
