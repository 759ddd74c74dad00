//! Snapshots - per-tick copies of the simulation state.
//!
//! A [`Snapshot`] is the full observable state at the start of a tick. It
//! is stored in the run history, encoded with bincode for byte-level replay
//! comparison, and flattened into a JSON-friendly [`StateView`].

use std::io::{Read, Write};

use rescue_logic::geometry::Cell;
use rescue_logic::rules::{FireState, Outcome, PoiKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Plan;
use crate::crew::{AgentView, Crew};
use crate::state::{DoorRecord, IncidentState, Tally};

/// Snapshot format version (increment when the layout changes)
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Controller ticks completed when the snapshot was taken.
    pub tick: u64,
    /// Roster index of the agent whose turn is next.
    pub turn_index: usize,
    /// Fire level rows, `y = 0` first.
    pub fire: Vec<Vec<FireState>>,
    /// Closed flags per side `[up, right, down, left]`.
    pub walls: Vec<Vec<[bool; 4]>>,
    pub damage: Vec<Vec<[u8; 4]>>,
    pub doors: Vec<DoorRecord>,
    /// Face-down markers in ascending cell order.
    pub pois: Vec<(Cell, PoiKind)>,
    pub hidden_victims: u32,
    pub hidden_false_alarms: u32,
    pub on_board: u32,
    pub agents: Vec<AgentView>,
    /// Goal-directed routes carried into the next turn, in turn order.
    pub plans: Vec<Plan>,
    pub tally: Tally,
}

impl Snapshot {
    pub fn capture(tick: u64, turn_index: usize, state: &IncidentState, crew: &Crew) -> Self {
        let pois = state.pois();
        Self {
            version: SNAPSHOT_VERSION,
            tick,
            turn_index,
            fire: state.fire().rows(),
            walls: state.structure().walls().rows(),
            damage: state.structure().damage().rows(),
            doors: state.structure().doors(),
            pois: pois.placed().collect(),
            hidden_victims: pois.hidden_victims(),
            hidden_false_alarms: pois.hidden_false_alarms(),
            on_board: pois.on_board(),
            agents: crew.views(),
            plans: crew.plans(),
            tally: state.tally(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serialize(snapshot)?)
}

pub fn decode(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    check_version(bincode::deserialize(bytes)?)
}

/// Write a snapshot to any writer.
pub fn write_snapshot<W: Write>(writer: W, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    bincode::serialize_into(writer, snapshot)?;
    Ok(())
}

/// Read a snapshot back, rejecting other format versions.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot, SnapshotError> {
    check_version(bincode::deserialize_from(reader)?)
}

fn check_version(snapshot: Snapshot) -> Result<Snapshot, SnapshotError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

/// One rescuer as reported to viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: u8,
    pub x: i32,
    pub y: i32,
    pub ap: u8,
    pub carrying_victim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub x: i32,
    pub y: i32,
}

/// Flat, numeric state for external viewers.
///
/// Fire levels are `0` clear, `1` smoke, `2` fire. Walls are `1` closed,
/// `0` open, per side `[up, right, down, left]`. Marker kinds stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    pub step: u64,
    pub agents: Vec<AgentReport>,
    pub fire: Vec<Vec<u8>>,
    pub walls: Vec<Vec<[u8; 4]>>,
    pub walls_damage: Vec<Vec<[u8; 4]>>,
    pub pois: Vec<CellReport>,
    pub damage: u32,
    pub rescued: u32,
    pub lost: u32,
    pub outcome: Option<Outcome>,
}

impl StateView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let fire_level = |f: &FireState| -> u8 {
            match f {
                FireState::Clear => 0,
                FireState::Smoke => 1,
                FireState::Fire => 2,
            }
        };
        let tally = snapshot.tally;
        Self {
            step: snapshot.tick,
            agents: snapshot
                .agents
                .iter()
                .map(|a| AgentReport {
                    id: a.id.0,
                    x: a.pos.x,
                    y: a.pos.y,
                    ap: a.ap,
                    carrying_victim: a.carrying,
                })
                .collect(),
            fire: snapshot
                .fire
                .iter()
                .map(|row| row.iter().map(fire_level).collect())
                .collect(),
            walls: snapshot
                .walls
                .iter()
                .map(|row| row.iter().map(|bits| bits.map(u8::from)).collect())
                .collect(),
            walls_damage: snapshot.damage.clone(),
            pois: snapshot
                .pois
                .iter()
                .map(|(cell, _)| CellReport {
                    x: cell.x,
                    y: cell.y,
                })
                .collect(),
            damage: tally.damage,
            rescued: tally.rescued,
            lost: tally.lost,
            outcome: rescue_logic::rules::outcome(tally.rescued, tally.lost, tally.damage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RuleSet;
    use crate::systems::goal_directed_turn;
    use rescue_logic::scenario::ScenarioData;

    fn initial() -> Snapshot {
        let data = ScenarioData::standard().unwrap();
        let state = IncidentState::from_scenario(&data, RuleSet::default()).unwrap();
        let crew = Crew::spawn(&data);
        Snapshot::capture(0, 0, &state, &crew)
    }

    #[test]
    fn test_encode_decode() {
        let snap = initial();
        let bytes = encode(&snap).unwrap();
        assert_eq!(decode(&bytes).unwrap(), snap);

        let mut buf = Vec::new();
        write_snapshot(&mut buf, &snap).unwrap();
        assert_eq!(buf, bytes);
        assert_eq!(read_snapshot(buf.as_slice()).unwrap(), snap);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut snap = initial();
        snap.version = SNAPSHOT_VERSION + 1;
        let bytes = encode(&snap).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::VersionMismatch { found, .. }) if found == SNAPSHOT_VERSION + 1
        ));
    }

    #[test]
    fn test_pending_plans_are_captured() {
        let data = ScenarioData::standard().unwrap();
        let mut state = IncidentState::from_scenario(&data, RuleSet::default()).unwrap();
        let mut crew = Crew::spawn(&data);
        assert!(initial().plans.iter().all(|plan| *plan == Plan::default()));

        let mut actor = crew.actor(0).unwrap();
        let mut plan = crew.take_plan(0);
        goal_directed_turn(&mut state, &mut actor, &mut plan);
        crew.store(&actor);
        crew.put_plan(0, plan.clone());

        let snap = Snapshot::capture(1, 1, &state, &crew);
        assert_eq!(snap.plans.len(), crew.len());
        assert_eq!(snap.plans[0], plan);
        assert_eq!(decode(&encode(&snap).unwrap()).unwrap().plans[0], plan);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_state_view_shape() {
        let view = StateView::from_snapshot(&initial());
        assert_eq!(view.fire.len(), 6);
        assert_eq!(view.fire[0].len(), 8);
        // (1,4) burns
        assert_eq!(view.fire[4][1], 2);
        assert_eq!(view.agents.len(), 6);
        assert_eq!(view.pois.len(), 3);
        assert_eq!(view.walls[0][0], [0, 0, 1, 1]);
        assert_eq!(view.outcome, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["agents"][0]["carrying_victim"], false);
    }
}
