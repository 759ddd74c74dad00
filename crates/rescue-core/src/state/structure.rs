//! Walls, doors and their damage.
//!
//! Every wall side is stored on both cells it separates and the two copies
//! are always written together. A door is a registry entry keyed by
//! `(cell, side)`, present in both directions; its open/closed flag is the
//! wall bit on that side. Destroying a door removes both entries and leaves
//! the side open, indistinguishable from no wall at all.

use rescue_logic::constants::structure::WALL_HITS_TO_DEMOLISH;
use rescue_logic::geometry::{BoardSize, Cell, Direction, Grid};
use rescue_logic::scenario::ScenarioData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of one hit on a standing wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallHit {
    Damaged,
    Demolished,
}

/// One direction of a door registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorRecord {
    pub cell: Cell,
    pub side: Direction,
    pub other: Cell,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    size: BoardSize,
    /// `true` = closed (standing wall or closed door).
    walls: Grid<[bool; 4]>,
    damage: Grid<[u8; 4]>,
    doors: BTreeMap<(Cell, Direction), Cell>,
}

impl Structure {
    /// Build from validated scenario data.
    pub fn from_scenario(data: &ScenarioData) -> Self {
        let size = data.size();
        let mut walls = Grid::filled(size, [false; 4]);
        for cell in size.cells() {
            let mut bits = [false; 4];
            for side in Direction::SIDES {
                bits[side.index()] = data.wall_closed(cell, side);
            }
            walls.set(cell, bits);
        }

        let mut doors = BTreeMap::new();
        for door in &data.doors {
            if let Some(side) = door.a.direction_to(door.b) {
                doors.insert((door.a, side), door.b);
                doors.insert((door.b, side.opposite()), door.a);
            }
        }

        Self {
            size,
            walls,
            damage: Grid::filled(size, [0; 4]),
            doors,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Whether `side` of `cell` is blocked. Off-board cells read as open.
    pub fn is_closed(&self, cell: Cell, side: Direction) -> bool {
        self.walls
            .get(cell)
            .is_some_and(|bits| bits[side.index()])
    }

    /// Adjacent, on-board and not separated by a closed side (read from `from`).
    pub fn connected(&self, from: Cell, to: Cell) -> bool {
        if !self.size.contains(from) || !self.size.contains(to) {
            return false;
        }
        match from.direction_to(to) {
            Some(side) => !self.is_closed(from, side),
            None => false,
        }
    }

    /// The cell a door on `side` of `cell` leads to, if there is a door.
    pub fn door_on(&self, cell: Cell, side: Direction) -> Option<Cell> {
        self.doors.get(&(cell, side)).copied()
    }

    pub fn door_between(&self, a: Cell, b: Cell) -> bool {
        a.direction_to(b)
            .and_then(|side| self.door_on(a, side))
            .is_some_and(|other| other == b)
    }

    pub fn closed_door_between(&self, a: Cell, b: Cell) -> bool {
        self.door_between(a, b) && a.direction_to(b).is_some_and(|side| self.is_closed(a, side))
    }

    /// A closed side that is not a door.
    pub fn standing_wall_between(&self, a: Cell, b: Cell) -> bool {
        match a.direction_to(b) {
            Some(side) => self.is_closed(a, side) && self.door_on(a, side).is_none(),
            None => false,
        }
    }

    /// Open a closed door between `a` and `b`.
    pub fn open_door(&mut self, a: Cell, b: Cell) -> bool {
        if !self.closed_door_between(a, b) {
            return false;
        }
        match a.direction_to(b) {
            Some(side) => {
                self.set_closed(a, side, false);
                true
            }
            None => false,
        }
    }

    /// Tear a door out of its frame. Returns whether it was open beforehand.
    pub fn destroy_door(&mut self, cell: Cell, side: Direction) -> Option<bool> {
        let other = self.door_on(cell, side)?;
        let was_open = !self.is_closed(cell, side);
        self.doors.remove(&(cell, side));
        self.doors.remove(&(other, side.opposite()));
        self.set_closed(cell, side, false);
        Some(was_open)
    }

    /// Hit a standing plain wall once. Doors and open sides are not walls.
    ///
    /// Damage is recorded on both faces; the side comes down exactly when the
    /// counter reaches [`WALL_HITS_TO_DEMOLISH`].
    pub fn hit_wall(&mut self, cell: Cell, side: Direction) -> Option<WallHit> {
        if !self.is_closed(cell, side) || self.door_on(cell, side).is_some() {
            return None;
        }
        let hits = self.bump_damage(cell, side);
        let neighbor = cell.step(side);
        if self.size.contains(neighbor) {
            self.bump_damage(neighbor, side.opposite());
        }
        if hits >= WALL_HITS_TO_DEMOLISH {
            self.set_closed(cell, side, false);
            Some(WallHit::Demolished)
        } else {
            Some(WallHit::Damaged)
        }
    }

    pub fn damage_at(&self, cell: Cell, side: Direction) -> u8 {
        self.damage.get(cell).map_or(0, |d| d[side.index()])
    }

    pub fn walls(&self) -> &Grid<[bool; 4]> {
        &self.walls
    }

    pub fn damage(&self) -> &Grid<[u8; 4]> {
        &self.damage
    }

    /// Every registry entry, both directions, in a stable order.
    pub fn doors(&self) -> Vec<DoorRecord> {
        self.doors
            .iter()
            .map(|(&(cell, side), &other)| DoorRecord {
                cell,
                side,
                other,
                closed: self.is_closed(cell, side),
            })
            .collect()
    }

    pub fn door_count(&self) -> usize {
        self.doors.len() / 2
    }

    fn bump_damage(&mut self, cell: Cell, side: Direction) -> u8 {
        match self.damage.get_mut(cell) {
            Some(d) => {
                let slot = &mut d[side.index()];
                *slot = (*slot + 1).min(WALL_HITS_TO_DEMOLISH);
                *slot
            }
            None => 0,
        }
    }

    /// Write a side on both faces.
    fn set_closed(&mut self, cell: Cell, side: Direction, closed: bool) {
        if let Some(bits) = self.walls.get_mut(cell) {
            bits[side.index()] = closed;
        }
        if let Some(bits) = self.walls.get_mut(cell.step(side)) {
            bits[side.opposite().index()] = closed;
        }
    }
}
