//! Append-only incident event log.

use crate::components::AgentId;
use rescue_logic::geometry::Cell;
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Move,
    RemoveSmoke,
    ExtinguishFire,
    FireToSmoke,
    PickUpVictim,
    DropOffVictim,
    OpenDoor,
    DamageWall,
    DemolishWall,
    DestroyDoor,
    RemoveFalseAlarm,
    KnockOut,
}

/// One immutable log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Controller tick the event happened in.
    pub step: u64,
    /// Acting agent; `None` for fire and explosion effects.
    pub agent: Option<AgentId>,
    pub action: ActionKind,
    pub pos: Cell,
    /// Second cell for two-sided actions (doors, walls).
    pub other: Option<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn count(&self, action: ActionKind) -> usize {
        self.events.iter().filter(|e| e.action == action).count()
    }
}
