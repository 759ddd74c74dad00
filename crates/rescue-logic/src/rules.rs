//! Pure rules - cell states, the AP budget, move costs and end conditions.

use crate::constants::{ap, costs, end};
use serde::{Deserialize, Serialize};

/// Fire level of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireState {
    #[default]
    Clear,
    Smoke,
    Fire,
}

/// What an unrevealed point of interest turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoiKind {
    Victim,
    FalseAlarm,
}

/// Per-agent action point budget, always within `0..=ap::CAP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionPoints(u8);

impl ActionPoints {
    pub fn new(value: u8) -> Self {
        Self(value.min(ap::CAP))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Turn-start refill. Unspent points carry over, capped.
    pub fn refill(&mut self) {
        self.0 = self.0.saturating_add(ap::REFILL).min(ap::CAP);
    }

    pub fn can_spend(self, cost: u8) -> bool {
        self.0 >= cost
    }

    /// Deduct `cost` if affordable. Leaves the budget untouched otherwise.
    pub fn spend(&mut self, cost: u8) -> bool {
        if self.can_spend(cost) {
            self.0 -= cost;
            true
        } else {
            false
        }
    }
}

/// AP to step onto a cell in `target` state, or `None` if the step is illegal.
///
/// Carrying a victim doubles the normal cost and forbids entering fire.
pub fn move_cost(target: FireState, carrying: bool) -> Option<u8> {
    match (target, carrying) {
        (FireState::Fire, true) => None,
        (FireState::Fire, false) => Some(costs::MOVE_INTO_FIRE),
        (_, true) => Some(costs::MOVE_CARRYING),
        (_, false) => Some(costs::MOVE),
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Enough victims carried out.
    Rescued,
    /// The structure took too much damage.
    Collapsed,
    /// Too many victims lost.
    VictimsLost,
}

/// Evaluate the end conditions. All three inputs only ever grow, so once
/// this returns `Some` it keeps returning `Some`.
pub fn outcome(rescued: u32, lost: u32, damage: u32) -> Option<Outcome> {
    if rescued >= end::RESCUES_TO_WIN {
        Some(Outcome::Rescued)
    } else if damage >= end::DAMAGE_TO_COLLAPSE {
        Some(Outcome::Collapsed)
    } else if lost >= end::LOSSES_TO_LOSE {
        Some(Outcome::VictimsLost)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refill_caps_at_eight() {
        let mut points = ActionPoints::new(7);
        points.refill();
        assert_eq!(points.get(), 8);

        let mut points = ActionPoints::new(2);
        points.refill();
        assert_eq!(points.get(), 6);
        points.refill();
        assert_eq!(points.get(), 8);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(ActionPoints::new(11).get(), 8);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut points = ActionPoints::new(3);
        assert!(!points.spend(4));
        assert_eq!(points.get(), 3);
        assert!(points.spend(3));
        assert!(points.is_empty());
    }

    #[test]
    fn test_move_costs() {
        assert_eq!(move_cost(FireState::Clear, false), Some(1));
        assert_eq!(move_cost(FireState::Smoke, false), Some(1));
        assert_eq!(move_cost(FireState::Fire, false), Some(2));
        assert_eq!(move_cost(FireState::Clear, true), Some(2));
        assert_eq!(move_cost(FireState::Fire, true), None);
    }

    #[test]
    fn test_outcome_thresholds() {
        assert_eq!(outcome(6, 3, 23), None);
        assert_eq!(outcome(7, 0, 0), Some(Outcome::Rescued));
        assert_eq!(outcome(0, 4, 0), Some(Outcome::VictimsLost));
        assert_eq!(outcome(0, 0, 24), Some(Outcome::Collapsed));
        // win is checked first
        assert_eq!(outcome(7, 4, 24), Some(Outcome::Rescued));
    }
}
