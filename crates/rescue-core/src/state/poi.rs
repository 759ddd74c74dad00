//! Point-of-interest pool - the bag of hidden victims and false alarms,
//! plus the markers currently face down on the board.

use rescue_logic::geometry::Cell;
use rescue_logic::rules::PoiKind;
use rescue_logic::scenario::ScenarioData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiPool {
    hidden_victims: u32,
    hidden_false_alarms: u32,
    /// Unrevealed markers by cell.
    placed: BTreeMap<Cell, PoiKind>,
    /// Victims currently being carried.
    on_board: u32,
}

impl PoiPool {
    /// Seed from scenario data; pre-placed markers come out of the bag.
    pub fn from_scenario(data: &ScenarioData) -> Self {
        let mut placed = BTreeMap::new();
        for &cell in &data.victims {
            placed.insert(cell, PoiKind::Victim);
        }
        for &cell in &data.false_alarms {
            placed.insert(cell, PoiKind::FalseAlarm);
        }
        Self {
            hidden_victims: data.total_victims.saturating_sub(data.victims.len() as u32),
            hidden_false_alarms: data
                .total_false_alarms
                .saturating_sub(data.false_alarms.len() as u32),
            placed,
            on_board: 0,
        }
    }

    pub fn hidden_victims(&self) -> u32 {
        self.hidden_victims
    }

    pub fn hidden_false_alarms(&self) -> u32 {
        self.hidden_false_alarms
    }

    pub fn is_exhausted(&self) -> bool {
        self.hidden_victims == 0 && self.hidden_false_alarms == 0
    }

    pub fn kind_at(&self, cell: Cell) -> Option<PoiKind> {
        self.placed.get(&cell).copied()
    }

    /// Unrevealed markers in ascending cell order.
    pub fn placed(&self) -> impl Iterator<Item = (Cell, PoiKind)> + '_ {
        self.placed.iter().map(|(&cell, &kind)| (cell, kind))
    }

    pub fn unrevealed(&self) -> u32 {
        self.placed.len() as u32
    }

    pub fn placed_of(&self, kind: PoiKind) -> u32 {
        self.placed.values().filter(|&&k| k == kind).count() as u32
    }

    pub fn on_board(&self) -> u32 {
        self.on_board
    }

    /// Draw a kind from the bag, weighted by what remains, and remove it.
    ///
    /// `roll` must be uniform in `0..total` where `total` is the bag size.
    pub(crate) fn draw(&mut self, roll: impl FnOnce(u32) -> u32) -> Option<PoiKind> {
        let total = self.hidden_victims + self.hidden_false_alarms;
        if total == 0 {
            return None;
        }
        if roll(total) < self.hidden_victims {
            self.hidden_victims -= 1;
            Some(PoiKind::Victim)
        } else {
            self.hidden_false_alarms -= 1;
            Some(PoiKind::FalseAlarm)
        }
    }

    /// Put a face-down marker on an empty cell.
    pub(crate) fn place(&mut self, cell: Cell, kind: PoiKind) -> bool {
        if self.placed.contains_key(&cell) {
            return false;
        }
        self.placed.insert(cell, kind);
        true
    }

    /// Remove a marker, revealing what it was.
    pub(crate) fn take(&mut self, cell: Cell) -> Option<PoiKind> {
        self.placed.remove(&cell)
    }

    pub(crate) fn victim_picked_up(&mut self) {
        self.on_board += 1;
    }

    pub(crate) fn victim_left_board(&mut self) {
        self.on_board = self.on_board.saturating_sub(1);
    }

    /// Reproduces the legacy rule that burns a false alarm out of the bag
    /// a second time.
    pub(crate) fn forfeit_false_alarm(&mut self) {
        self.hidden_false_alarms = self.hidden_false_alarms.saturating_sub(1);
    }
}
