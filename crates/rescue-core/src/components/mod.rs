//! Component definitions for crew entities.
//!
//! Components are pure data attached to entities in the crew's `hecs::World`.
//! They have no behavior; that lives in systems.

use rescue_logic::geometry::Cell;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub use rescue_logic::rules::ActionPoints;

/// Stable agent identity, as it appears in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u8);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Marks an entity as a rescuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firefighter {
    pub id: AgentId,
}

/// Board cell the entity stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position(pub Cell);

/// Whether the rescuer is carrying a victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Carrying(pub bool);

/// Goal-directed route state, carried between turns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub target: Option<Cell>,
    /// Remaining cells to step onto, nearest first.
    pub path: VecDeque<Cell>,
}

impl Plan {
    pub fn clear(&mut self) {
        self.target = None;
        self.path.clear();
    }
}
