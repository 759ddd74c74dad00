//! Fire system - advance, explosion, shockwave, flashover and their
//! structural and human consequences.

use rand::Rng;
use rescue_logic::geometry::{Cell, Direction};
use rescue_logic::rules::{FireState, PoiKind};

use super::random_cell;
use crate::components::Plan;
use crate::crew::Crew;
use crate::state::{ActionKind, IncidentState};

/// Whether a blast keeps travelling past a wall side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// One fire advance: a random cell worsens one level, then a single
/// flashover pass. Returns the drawn cell.
pub fn advance_fire<R: Rng + ?Sized>(
    state: &mut IncidentState,
    crew: &mut Crew,
    rng: &mut R,
) -> Cell {
    let cell = random_cell(state.size(), rng);
    spread_at(state, crew, cell);
    flashover(state, crew);
    cell
}

/// Worsen `cell` by one level; a burning cell explodes instead.
pub fn spread_at(state: &mut IncidentState, crew: &mut Crew, cell: Cell) {
    match state.fire_at(cell) {
        FireState::Clear => {
            state.set_fire(cell, FireState::Smoke);
            if state.adjacent_to_fire(cell) {
                place_fire(state, crew, cell);
            } else {
                log::debug!("smoke at {}", cell);
            }
        }
        FireState::Smoke => place_fire(state, crew, cell),
        FireState::Fire => explosion(state, crew, cell),
    }
}

/// Blast every side of `cell`; sides left open send a shockwave onward.
pub fn explosion(state: &mut IncidentState, crew: &mut Crew, cell: Cell) {
    log::debug!("explosion at {}", cell);
    for dir in Direction::SCAN {
        let neighbor = cell.step(dir);
        if damage_wall(state, cell, dir) == Propagation::Continue
            && state.connected(cell, neighbor)
        {
            shockwave(state, crew, neighbor, dir);
        }
    }
}

/// Travel from `start` in `dir` until the blast ignites a cell or is
/// absorbed by structure.
pub fn shockwave(state: &mut IncidentState, crew: &mut Crew, start: Cell, dir: Direction) {
    let mut cell = start;
    while state.size().contains(cell) {
        let prev = cell.step(dir.opposite());
        if !state.connected(prev, cell) {
            break;
        }
        match state.fire_at(cell) {
            FireState::Clear | FireState::Smoke => {
                place_fire(state, crew, cell);
                break;
            }
            FireState::Fire => {
                if damage_wall(state, cell, dir) == Propagation::Stop {
                    break;
                }
                cell = cell.step(dir);
            }
        }
    }
}

/// Escalate smoke next to fire, scanning rows once. Returns the number of
/// cells that caught.
pub fn flashover(state: &mut IncidentState, crew: &mut Crew) -> usize {
    let mut caught = 0;
    for cell in state.size().cells() {
        if state.fire_at(cell) == FireState::Smoke && state.adjacent_to_fire(cell) {
            place_fire(state, crew, cell);
            caught += 1;
        }
    }
    if caught > 0 {
        log::debug!("flashover: {} cells", caught);
    }
    caught
}

/// Set `cell` on fire, destroying any face-down marker there and knocking
/// out everyone standing on it.
pub fn place_fire(state: &mut IncidentState, crew: &mut Crew, cell: Cell) {
    if !state.set_fire(cell, FireState::Fire) {
        return;
    }
    log::debug!("fire at {}", cell);

    match state.pois_mut().take(cell) {
        Some(PoiKind::Victim) => {
            state.tally_mut().lost += 1;
            log::info!("victim at {} lost to fire", cell);
        }
        Some(PoiKind::FalseAlarm) => {
            state.tally_mut().false_alarms_burned += 1;
            if state.rules().double_count_burned_false_alarms {
                state.pois_mut().forfeit_false_alarm();
            }
        }
        None => {}
    }

    for index in crew.at(cell) {
        knock_out(state, crew, index);
    }
}

/// Apply blast force to `side` of `cell`.
///
/// Doors are torn out whatever their state; an open one lets the blast
/// through. A standing wall takes one hit and absorbs the blast.
pub fn damage_wall(state: &mut IncidentState, cell: Cell, side: Direction) -> Propagation {
    if let Some(other) = state.structure().door_on(cell, side) {
        let was_open = state
            .structure_mut()
            .destroy_door(cell, side)
            .unwrap_or(false);
        state.log(None, ActionKind::DestroyDoor, cell, Some(other));
        log::debug!("door {} - {} destroyed (open: {})", cell, other, was_open);
        return if was_open {
            Propagation::Continue
        } else {
            Propagation::Stop
        };
    }
    if state.structure().is_closed(cell, side) {
        state.strike_wall(cell, side, None);
        return Propagation::Stop;
    }
    Propagation::Continue
}

/// Send a rescuer back to the nearest entry, losing any carried victim.
pub fn knock_out(state: &mut IncidentState, crew: &mut Crew, index: usize) {
    let Some(mut actor) = crew.actor(index) else {
        return;
    };
    let from = actor.pos;
    if actor.carrying {
        actor.carrying = false;
        state.tally_mut().lost += 1;
        state.pois_mut().victim_left_board();
    }
    actor.pos = state.nearest_entry(from);
    crew.store(&actor);
    crew.put_plan(index, Plan::default());
    state.log(Some(actor.id), ActionKind::KnockOut, actor.pos, Some(from));
    log::info!("agent {} knocked out at {}, back to {}", actor.id, from, actor.pos);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RuleSet;
    use rescue_logic::scenario::ScenarioData;

    fn setup() -> (IncidentState, Crew) {
        let data = ScenarioData::standard().unwrap();
        let state = IncidentState::from_scenario(&data, RuleSet::default()).unwrap();
        (state, Crew::spawn(&data))
    }

    #[test]
    fn test_clear_cell_turns_to_smoke() {
        let (mut state, mut crew) = setup();
        // (0,0) has no burning neighbor
        spread_at(&mut state, &mut crew, Cell::new(0, 0));
        assert_eq!(state.fire_at(Cell::new(0, 0)), FireState::Smoke);
    }

    #[test]
    fn test_smoke_becomes_fire() {
        let (mut state, mut crew) = setup();
        let cell = Cell::new(0, 0);
        state.set_fire(cell, FireState::Smoke);
        spread_at(&mut state, &mut crew, cell);
        assert_eq!(state.fire_at(cell), FireState::Fire);
    }

    #[test]
    fn test_fire_destroys_marker_once() {
        let (mut state, mut crew) = setup();
        place_fire(&mut state, &mut crew, Cell::new(3, 4));
        assert_eq!(state.tally().lost, 1);
        assert_eq!(state.pois().kind_at(Cell::new(3, 4)), None);
        place_fire(&mut state, &mut crew, Cell::new(3, 4));
        assert_eq!(state.tally().lost, 1);

        place_fire(&mut state, &mut crew, Cell::new(0, 1));
        assert_eq!(state.tally().false_alarms_burned, 1);
        assert_eq!(state.pois().hidden_false_alarms(), 4);
        assert_eq!(state.ledger(), state.ledger_totals());
    }

    #[test]
    fn test_legacy_rule_double_counts_burned_false_alarm() {
        let data = ScenarioData::standard().unwrap();
        let rules = RuleSet {
            double_count_burned_false_alarms: true,
        };
        let mut state = IncidentState::from_scenario(&data, rules).unwrap();
        let mut crew = Crew::spawn(&data);
        place_fire(&mut state, &mut crew, Cell::new(0, 1));
        assert_eq!(state.pois().hidden_false_alarms(), 3);
        assert_eq!(state.ledger().1, 4);
    }

    #[test]
    fn test_knock_out_drops_victim_and_returns_to_entry() {
        let (mut state, mut crew) = setup();
        let mut actor = crew.actor(0).unwrap();
        actor.pos = Cell::new(4, 2);
        actor.carrying = true;
        crew.store(&actor);
        // the victim marker at (3,4) leaves the board with the rescuer
        assert!(state.pois_mut().take(Cell::new(3, 4)).is_some());
        state.pois_mut().victim_picked_up();
        assert_eq!(state.ledger(), state.ledger_totals());

        place_fire(&mut state, &mut crew, Cell::new(4, 2));

        let after = crew.actor(0).unwrap();
        assert!(!after.carrying);
        // (7,2) is 3 away, (5,5) is 4 away
        assert_eq!(after.pos, Cell::new(7, 2));
        assert_eq!(state.tally().lost, 1);
        assert_eq!(state.pois().on_board(), 0);
        assert_eq!(state.events().count(ActionKind::KnockOut), 1);
        assert_eq!(state.ledger(), state.ledger_totals());
    }

    #[test]
    fn test_closed_door_absorbs_blast() {
        let (mut state, _) = setup();
        let cell = Cell::new(1, 3);
        assert_eq!(
            damage_wall(&mut state, cell, Direction::Right),
            Propagation::Stop
        );
        assert_eq!(state.structure().door_on(cell, Direction::Right), None);
        assert!(state.connected(cell, Cell::new(2, 3)));
        assert_eq!(state.tally().damage, 0);
        assert_eq!(state.events().count(ActionKind::DestroyDoor), 1);
    }

    #[test]
    fn test_open_door_lets_blast_through() {
        let (mut state, _) = setup();
        let (a, b) = (Cell::new(1, 3), Cell::new(2, 3));
        state.structure_mut().open_door(a, b);
        assert_eq!(
            damage_wall(&mut state, a, Direction::Right),
            Propagation::Continue
        );
        assert!(!state.structure().door_between(a, b));
    }

    #[test]
    fn test_wall_absorbs_blast_and_counts_damage() {
        let (mut state, _) = setup();
        assert_eq!(
            damage_wall(&mut state, Cell::new(1, 2), Direction::Right),
            Propagation::Stop
        );
        assert_eq!(state.tally().damage, 1);
        assert_eq!(
            damage_wall(&mut state, Cell::new(1, 2), Direction::Right),
            Propagation::Stop
        );
        assert_eq!(state.tally().damage, 2);
        assert_eq!(
            damage_wall(&mut state, Cell::new(1, 2), Direction::Right),
            Propagation::Continue
        );
        assert_eq!(state.tally().damage, 2);
    }

    #[test]
    fn test_flashover_is_a_single_pass() {
        let (mut state, mut crew) = setup();
        // (0,0) and (1,0) are connected; (1,1)->(1,0) connection is checked below
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        assert!(state.connected(a, b));
        state.set_fire(a, FireState::Fire);
        state.set_fire(b, FireState::Smoke);
        let caught = flashover(&mut state, &mut crew);
        assert!(caught >= 1);
        assert_eq!(state.fire_at(b), FireState::Fire);
    }
}
