use serde::{Deserialize, Serialize};

/// A policy card chosen during the action phase. Applied at the next resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub name: String,
    /// Percent change applied to the money per round, -100..=100.
    pub money_difference: i32,
    /// Satisfaction points granted at the next resume, -100..=100.
    pub satisfaction_percentage_difference: i32,
}

impl ActionCard {
    pub fn new(name: impl Into<String>, money_difference: i32, satisfaction: i32) -> Self {
        Self {
            name: name.into(),
            money_difference: money_difference.clamp(-100, 100),
            satisfaction_percentage_difference: satisfaction.clamp(-100, 100),
        }
    }

    pub fn standard_deck() -> Vec<ActionCard> {
        vec![
            ActionCard::new("Tax Relief", -10, 6),
            ActionCard::new("Street Festival", -5, 10),
            ActionCard::new("Austerity", 15, -12),
            ActionCard::new("Business Incentives", 10, -4),
            ActionCard::new("Status Quo", 0, 0),
        ]
    }

    /// "+10", "-5" or "=0".
    pub fn money_label(&self) -> String {
        signed_label(self.money_difference)
    }

    pub fn satisfaction_label(&self) -> String {
        signed_label(self.satisfaction_percentage_difference)
    }
}

fn signed_label(value: i32) -> String {
    match value {
        v if v > 0 => format!("+{v}"),
        0 => "=0".to_string(),
        v => v.to_string(),
    }
}

/// Money per round after a card's percentage change, rounded half to even.
pub fn adjusted_money_per_round(money_per_round: i64, money_difference: i32) -> i64 {
    let change = money_per_round as f32 * (money_difference as f32 / 100.0);
    money_per_round + f64::from(change).round_ties_even() as i64
}
