//! Incident state - everything the engine mutates apart from the crew.
//!
//! One owned value holds the structure, the fire grid, the POI pool, the
//! running tally and the event log. Systems change it only through the
//! `pub(crate)` operations below, so a completed engine call never leaves a
//! half-applied change behind.

mod events;
mod poi;
mod structure;

pub use events::{ActionKind, Event, EventLog};
pub use poi::PoiPool;
pub use structure::{DoorRecord, Structure, WallHit};

use crate::components::AgentId;
use rescue_logic::geometry::{BoardSize, Cell, Direction, Grid};
use rescue_logic::rules::{self, FireState, Outcome, PoiKind};
use rescue_logic::scenario::{ScenarioData, ScenarioError};
use serde::{Deserialize, Serialize};

/// Rule toggles that change observable behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// When fire burns a face-down false alarm, also take one out of the
    /// bag. Breaks the false-alarm ledger; kept for replaying old runs.
    pub double_count_burned_false_alarms: bool,
}

/// Running totals. Every field only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Cumulative structural damage (wall hits).
    pub damage: u32,
    pub rescued: u32,
    pub lost: u32,
    /// False alarms turned over by agents.
    pub false_alarms_cleared: u32,
    /// False alarms destroyed by fire.
    pub false_alarms_burned: u32,
}

#[derive(Debug, Clone)]
pub struct IncidentState {
    size: BoardSize,
    structure: Structure,
    fire: Grid<FireState>,
    pois: PoiPool,
    tally: Tally,
    entries: Vec<Cell>,
    events: EventLog,
    step: u64,
    rules: RuleSet,
    total_victims: u32,
    total_false_alarms: u32,
}

impl IncidentState {
    /// Validate `data` and build the initial state.
    pub fn from_scenario(data: &ScenarioData, rules: RuleSet) -> Result<Self, ScenarioError> {
        data.validate()?;
        Ok(Self::from_validated(data, rules))
    }

    pub(crate) fn from_validated(data: &ScenarioData, rules: RuleSet) -> Self {
        let size = data.size();
        let mut fire = Grid::filled(size, FireState::Clear);
        for &cell in &data.fire {
            fire.set(cell, FireState::Fire);
        }
        Self {
            size,
            structure: Structure::from_scenario(data),
            fire,
            pois: PoiPool::from_scenario(data),
            tally: Tally::default(),
            entries: data.entries.clone(),
            events: EventLog::new(),
            step: 0,
            rules,
            total_victims: data.total_victims,
            total_false_alarms: data.total_false_alarms,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn fire(&self) -> &Grid<FireState> {
        &self.fire
    }

    /// Fire level of `cell`. Off-board reads as clear.
    pub fn fire_at(&self, cell: Cell) -> FireState {
        self.fire.get(cell).copied().unwrap_or_default()
    }

    pub fn pois(&self) -> &PoiPool {
        &self.pois
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn entries(&self) -> &[Cell] {
        &self.entries
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn connected(&self, from: Cell, to: Cell) -> bool {
        self.structure.connected(from, to)
    }

    /// A connected neighbor is burning.
    pub fn adjacent_to_fire(&self, cell: Cell) -> bool {
        self.size
            .neighbors(cell)
            .any(|(_, n)| self.connected(cell, n) && self.fire_at(n) == FireState::Fire)
    }

    pub fn is_entry(&self, cell: Cell) -> bool {
        self.entries.contains(&cell)
    }

    /// Closest entry by Manhattan distance; ties go to the earlier entry.
    pub fn nearest_entry(&self, from: Cell) -> Cell {
        self.entries
            .iter()
            .copied()
            .min_by_key(|entry| entry.manhattan(from))
            .unwrap_or(from)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        rules::outcome(self.tally.rescued, self.tally.lost, self.tally.damage)
    }

    /// `(victims, false alarms)` accounted for across bag, board, carried
    /// and resolved. Equals the scenario totals unless the legacy
    /// double-count rule is on.
    pub fn ledger(&self) -> (u32, u32) {
        let p = &self.pois;
        let t = &self.tally;
        let victims = p.hidden_victims()
            + p.placed_of(PoiKind::Victim)
            + p.on_board()
            + t.rescued
            + t.lost;
        let false_alarms = p.hidden_false_alarms()
            + p.placed_of(PoiKind::FalseAlarm)
            + t.false_alarms_cleared
            + t.false_alarms_burned;
        (victims, false_alarms)
    }

    /// Scenario totals the ledger must match.
    pub fn ledger_totals(&self) -> (u32, u32) {
        (self.total_victims, self.total_false_alarms)
    }

    // ── mutation ────────────────────────────────────────────────────────

    pub(crate) fn begin_step(&mut self) -> u64 {
        self.step += 1;
        self.step
    }

    pub(crate) fn set_fire(&mut self, cell: Cell, state: FireState) -> bool {
        self.fire.set(cell, state)
    }

    pub(crate) fn structure_mut(&mut self) -> &mut Structure {
        &mut self.structure
    }

    pub(crate) fn pois_mut(&mut self) -> &mut PoiPool {
        &mut self.pois
    }

    pub(crate) fn tally_mut(&mut self) -> &mut Tally {
        &mut self.tally
    }

    pub(crate) fn log(
        &mut self,
        agent: Option<AgentId>,
        action: ActionKind,
        pos: Cell,
        other: Option<Cell>,
    ) {
        self.events.push(Event {
            step: self.step,
            agent,
            action,
            pos,
            other,
        });
    }

    /// Land one hit on a standing wall: structure damage, tally and log.
    pub(crate) fn strike_wall(
        &mut self,
        cell: Cell,
        side: Direction,
        agent: Option<AgentId>,
    ) -> Option<WallHit> {
        let hit = self.structure.hit_wall(cell, side)?;
        self.tally.damage += 1;
        let other = Some(cell.step(side)).filter(|n| self.size.contains(*n));
        let action = match hit {
            WallHit::Damaged => ActionKind::DamageWall,
            WallHit::Demolished => ActionKind::DemolishWall,
        };
        self.log(agent, action, cell, other);
        log::debug!(
            "wall {} {:?} {:?} (damage total {})",
            cell,
            side,
            hit,
            self.tally.damage
        );
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> IncidentState {
        IncidentState::from_scenario(&ScenarioData::standard().unwrap(), RuleSet::default())
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = standard();
        assert_eq!(state.fire_at(Cell::new(1, 4)), FireState::Fire);
        assert_eq!(state.fire_at(Cell::new(0, 0)), FireState::Clear);
        assert_eq!(state.fire_at(Cell::new(99, 0)), FireState::Clear);
        assert_eq!(state.ledger(), (10, 5));
        assert_eq!(state.ledger(), state.ledger_totals());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_nearest_entry_by_manhattan_distance() {
        let state = standard();
        // entries: (5,5) (0,3) (7,2) (2,0)
        assert_eq!(state.nearest_entry(Cell::new(4, 3)), Cell::new(5, 5));
        assert_eq!(state.nearest_entry(Cell::new(0, 0)), Cell::new(2, 0));
        assert_eq!(state.nearest_entry(Cell::new(0, 2)), Cell::new(0, 3));
        assert_eq!(state.nearest_entry(Cell::new(2, 0)), Cell::new(2, 0));
    }

    #[test]
    fn test_nearest_entry_tie_goes_to_list_order() {
        // (3,0) is 1 from both (2,0) and (4,0)
        let mut data = ScenarioData::standard().unwrap();
        data.entries.push(Cell::new(4, 0));
        let state = IncidentState::from_scenario(&data, RuleSet::default()).unwrap();
        assert_eq!(state.nearest_entry(Cell::new(3, 0)), Cell::new(2, 0));

        let mut data = ScenarioData::standard().unwrap();
        data.entries.insert(0, Cell::new(4, 0));
        data.crew_entries.iter_mut().for_each(|slot| *slot += 1);
        let state = IncidentState::from_scenario(&data, RuleSet::default()).unwrap();
        assert_eq!(state.nearest_entry(Cell::new(3, 0)), Cell::new(4, 0));
    }

    #[test]
    fn test_strike_wall_counts_damage_and_logs() {
        let mut state = standard();
        let cell = Cell::new(1, 2);
        assert_eq!(
            state.strike_wall(cell, Direction::Right, None),
            Some(WallHit::Damaged)
        );
        assert_eq!(
            state.strike_wall(cell, Direction::Right, None),
            Some(WallHit::Demolished)
        );
        assert_eq!(state.strike_wall(cell, Direction::Right, None), None);
        assert_eq!(state.tally().damage, 2);
        assert_eq!(state.events().count(ActionKind::DamageWall), 1);
        assert_eq!(state.events().count(ActionKind::DemolishWall), 1);
        assert_eq!(state.events().last().unwrap().other, Some(Cell::new(2, 2)));
    }

    #[test]
    fn test_rejects_malformed_scenario() {
        let mut data = ScenarioData::standard().unwrap();
        data.height = 7;
        assert!(IncidentState::from_scenario(&data, RuleSet::default()).is_err());
    }
}
