//! Scenario seed data - the fixed board an incident starts from.
//!
//! The standard board ships as JSON next to the workspace and is embedded
//! at compile time. Any malformed layout is rejected by [`ScenarioData::validate`]
//! before an engine can be built from it.

use crate::geometry::{BoardSize, Cell, Direction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const STANDARD_JSON: &str = include_str!("../../../data/standard_scenario.json");

/// A door between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub a: Cell,
    pub b: Cell,
}

/// Static initial layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// `walls[y][x]` = `[up, right, down, left]`, 1 = closed wall or closed door.
    pub walls: Vec<Vec<[u8; 4]>>,
    pub doors: Vec<DoorSpec>,
    pub fire: Vec<Cell>,
    pub victims: Vec<Cell>,
    pub false_alarms: Vec<Cell>,
    pub entries: Vec<Cell>,
    /// Entry index each agent starts on; its length is the crew size.
    pub crew_entries: Vec<usize>,
    pub total_victims: u32,
    pub total_false_alarms: u32,
}

/// Configuration faults found while loading scenario data.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: i32, height: i32 },
    #[error("wall data has {found} rows, board height is {expected}")]
    RowCountMismatch { expected: i32, found: usize },
    #[error("wall row {row} has {found} cells, board width is {expected}")]
    RowWidthMismatch { row: usize, expected: i32, found: usize },
    #[error("wall bit at {cell} side {side:?} is {value}, expected 0 or 1")]
    InvalidWallBit { cell: Cell, side: Direction, value: u8 },
    #[error("wall between {a} and {b} disagrees on each side")]
    AsymmetricWall { a: Cell, b: Cell },
    #[error("door {a} - {b} is off the board")]
    DoorOutOfBounds { a: Cell, b: Cell },
    #[error("door {a} - {b} does not join adjacent cells")]
    DoorNotAdjacent { a: Cell, b: Cell },
    #[error("door {a} - {b} is declared twice")]
    DuplicateDoor { a: Cell, b: Cell },
    #[error("{what} cell {cell} is off the board")]
    CellOutOfBounds { what: &'static str, cell: Cell },
    #[error("{what} cell {cell} is listed twice")]
    DuplicateCell { what: &'static str, cell: Cell },
    #[error("scenario defines no entries")]
    NoEntries,
    #[error("scenario defines no crew")]
    NoCrew,
    #[error("agent {agent} starts on entry #{entry}, only {available} entries exist")]
    UnknownEntry {
        agent: usize,
        entry: usize,
        available: usize,
    },
    #[error("{placed} {what} pre-placed but the pool only holds {total}")]
    PoolOverdrawn {
        what: &'static str,
        placed: usize,
        total: u32,
    },
}

impl ScenarioData {
    /// The embedded standard board, validated.
    pub fn standard() -> Result<Self, ScenarioError> {
        Self::from_json(STANDARD_JSON)
    }

    /// Parse and validate scenario JSON.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let data: ScenarioData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn size(&self) -> BoardSize {
        BoardSize::new(self.width, self.height)
    }

    pub fn crew_size(&self) -> usize {
        self.crew_entries.len()
    }

    /// Wall bit on `side` of `cell`. Off-board cells read as open.
    pub fn wall_closed(&self, cell: Cell, side: Direction) -> bool {
        if !self.size().contains(cell) {
            return false;
        }
        self.walls[cell.y as usize][cell.x as usize][side.index()] == 1
    }

    /// Reject layouts the engine cannot represent faithfully.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let size = self.size();
        if self.width <= 0 || self.height <= 0 {
            return Err(ScenarioError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.walls.len() != self.height as usize {
            return Err(ScenarioError::RowCountMismatch {
                expected: self.height,
                found: self.walls.len(),
            });
        }
        for (row, cells) in self.walls.iter().enumerate() {
            if cells.len() != self.width as usize {
                return Err(ScenarioError::RowWidthMismatch {
                    row,
                    expected: self.width,
                    found: cells.len(),
                });
            }
        }

        for cell in size.cells() {
            let bits = self.walls[cell.y as usize][cell.x as usize];
            for side in Direction::SIDES {
                let value = bits[side.index()];
                if value > 1 {
                    return Err(ScenarioError::InvalidWallBit { cell, side, value });
                }
                let other = cell.step(side);
                if size.contains(other)
                    && self.wall_closed(cell, side) != self.wall_closed(other, side.opposite())
                {
                    return Err(ScenarioError::AsymmetricWall { a: cell, b: other });
                }
            }
        }

        let mut seen_doors = HashSet::new();
        for door in &self.doors {
            let (a, b) = (door.a, door.b);
            if !size.contains(a) || !size.contains(b) {
                return Err(ScenarioError::DoorOutOfBounds { a, b });
            }
            if a.direction_to(b).is_none() {
                return Err(ScenarioError::DoorNotAdjacent { a, b });
            }
            let key = if a <= b { (a, b) } else { (b, a) };
            if !seen_doors.insert(key) {
                return Err(ScenarioError::DuplicateDoor { a, b });
            }
        }

        check_cells(size, "fire", &self.fire)?;
        check_cells(size, "entry", &self.entries)?;
        let mut poi_cells = self.victims.clone();
        poi_cells.extend(&self.false_alarms);
        check_cells(size, "point of interest", &poi_cells)?;

        if self.entries.is_empty() {
            return Err(ScenarioError::NoEntries);
        }
        if self.crew_entries.is_empty() {
            return Err(ScenarioError::NoCrew);
        }
        for (agent, &entry) in self.crew_entries.iter().enumerate() {
            if entry >= self.entries.len() {
                return Err(ScenarioError::UnknownEntry {
                    agent,
                    entry,
                    available: self.entries.len(),
                });
            }
        }

        if self.victims.len() > self.total_victims as usize {
            return Err(ScenarioError::PoolOverdrawn {
                what: "victims",
                placed: self.victims.len(),
                total: self.total_victims,
            });
        }
        if self.false_alarms.len() > self.total_false_alarms as usize {
            return Err(ScenarioError::PoolOverdrawn {
                what: "false alarms",
                placed: self.false_alarms.len(),
                total: self.total_false_alarms,
            });
        }

        Ok(())
    }
}

fn check_cells(size: BoardSize, what: &'static str, cells: &[Cell]) -> Result<(), ScenarioError> {
    let mut seen = HashSet::new();
    for &cell in cells {
        if !size.contains(cell) {
            return Err(ScenarioError::CellOutOfBounds { what, cell });
        }
        if !seen.insert(cell) {
            return Err(ScenarioError::DuplicateCell { what, cell });
        }
    }
    Ok(())
}
