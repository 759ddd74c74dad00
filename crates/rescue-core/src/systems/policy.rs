//! Decision policies - what a rescuer does with its turn.
//!
//! `GoalDirected` picks a target by search cost and follows an A* route to
//! it. `Reactive` samples random directions and takes whatever action the
//! neighbor offers.

use rand::Rng;
use rescue_logic::constants::{costs, penalties, REACTIVE_SAMPLES};
use rescue_logic::geometry::{Cell, Direction};
use rescue_logic::pathfinding::{find_path, shortest_cost, CostGraph};
use rescue_logic::rules::{self, FireState};
use serde::{Deserialize, Serialize};

use super::actions::{
    act_on_arrival, extinguish_fire, fire_to_smoke, remove_smoke, try_move, turn_start_context,
    MoveOutcome,
};
use crate::components::Plan;
use crate::crew::Actor;
use crate::state::IncidentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    GoalDirected,
    Reactive,
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal" | "goal_directed" | "goal-directed" => Ok(PolicyKind::GoalDirected),
            "reactive" | "random" => Ok(PolicyKind::Reactive),
            other => Err(format!("unknown policy '{}'", other)),
        }
    }
}

/// The board as the route planner sees it for one rescuer.
///
/// Edge cost is the AP move cost plus a bias for crossing a closed door or
/// a standing wall. Carrying into fire is not an edge.
pub struct SearchGraph<'a> {
    state: &'a IncidentState,
    carrying: bool,
}

impl<'a> SearchGraph<'a> {
    pub fn new(state: &'a IncidentState, carrying: bool) -> Self {
        Self { state, carrying }
    }
}

impl CostGraph for SearchGraph<'_> {
    fn edges(&self, from: Cell, out: &mut Vec<(Cell, u32)>) {
        let structure = self.state.structure();
        for (_, next) in self.state.size().neighbors(from) {
            let Some(cost) = rules::move_cost(self.state.fire_at(next), self.carrying) else {
                continue;
            };
            let bias = if structure.door_between(from, next) {
                if structure.closed_door_between(from, next) {
                    penalties::CLOSED_DOOR
                } else {
                    0
                }
            } else if structure.standing_wall_between(from, next) {
                penalties::STANDING_WALL
            } else {
                0
            };
            out.push((next, u32::from(cost) + bias));
        }
    }
}

/// Where the rescuer should head this turn.
///
/// Carrying: the nearest entry. Otherwise the cheapest reachable face-down
/// marker, else the cheapest reachable fire counting the cost to put it
/// out. Ties keep the first candidate.
pub fn select_target(state: &IncidentState, actor: &Actor) -> Option<Cell> {
    if actor.carrying {
        return Some(state.nearest_entry(actor.pos));
    }
    let graph = SearchGraph::new(state, actor.carrying);

    // candidates in row-major order so ties resolve the same way as fires
    let poi = cheapest(
        state
            .size()
            .cells()
            .filter(|&cell| state.pois().kind_at(cell).is_some()),
        |cell| shortest_cost(&graph, actor.pos, cell),
    );
    if poi.is_some() {
        return poi;
    }

    cheapest(
        state
            .size()
            .cells()
            .filter(|&cell| state.fire_at(cell) == FireState::Fire),
        |cell| {
            shortest_cost(&graph, actor.pos, cell).map(|c| c + u32::from(costs::EXTINGUISH))
        },
    )
}

fn cheapest(
    candidates: impl Iterator<Item = Cell>,
    cost: impl Fn(Cell) -> Option<u32>,
) -> Option<Cell> {
    let mut best: Option<(u32, Cell)> = None;
    for cell in candidates {
        let Some(c) = cost(cell) else { continue };
        if best.map_or(true, |(b, _)| c < b) {
            best = Some((c, cell));
        }
    }
    best.map(|(_, cell)| cell)
}

fn plan_route(state: &IncidentState, actor: &Actor, target: Cell) -> Vec<Cell> {
    let graph = SearchGraph::new(state, actor.carrying);
    find_path(&graph, actor.pos, target).unwrap_or_default()
}

/// One goal-directed turn.
pub fn goal_directed_turn(state: &mut IncidentState, actor: &mut Actor, plan: &mut Plan) {
    actor.ap.refill();
    turn_start_context(state, actor);

    let target = select_target(state, actor);
    plan.clear();
    if let Some(goal) = target {
        plan.target = Some(goal);
        plan.path = plan_route(state, actor, goal).into();
    }
    log::trace!(
        "agent {} at {} AP {} target {:?} route {}",
        actor.id,
        actor.pos,
        actor.ap.get(),
        plan.target,
        plan.path.len()
    );

    let mut fallback = target.map_or(true, |goal| goal == actor.pos);
    while !actor.ap.is_empty() {
        let Some(&next) = plan.path.front() else {
            break;
        };
        match try_move(state, actor, next) {
            MoveOutcome::Moved => {
                plan.path.pop_front();
                act_on_arrival(state, actor);
            }
            MoveOutcome::DoorOpened => {}
            MoveOutcome::Blocked => {
                plan.path = match plan.target {
                    Some(goal) => plan_route(state, actor, goal).into(),
                    None => Default::default(),
                };
                if plan.path.is_empty() {
                    fallback = true;
                }
                break;
            }
        }
    }

    if fallback {
        spend_on_neighbors(state, actor);
    }
}

/// Spend leftover AP on burning or smoky neighbors, in scan order.
pub fn spend_on_neighbors(state: &mut IncidentState, actor: &mut Actor) {
    for dir in Direction::SCAN {
        if actor.ap.is_empty() {
            break;
        }
        let next = actor.pos.step(dir);
        if !state.size().contains(next) {
            continue;
        }
        match state.fire_at(next) {
            FireState::Fire if actor.ap.can_spend(costs::EXTINGUISH) => {
                if try_move(state, actor, next) == MoveOutcome::Moved {
                    extinguish_fire(state, actor, next);
                }
            }
            FireState::Smoke if actor.ap.can_spend(costs::CLEAR_SMOKE) => {
                if try_move(state, actor, next) == MoveOutcome::Moved {
                    remove_smoke(state, actor, next);
                }
            }
            _ => {}
        }
    }
}

/// One reactive turn: up to [`REACTIVE_SAMPLES`] random directions.
pub fn reactive_turn<R: Rng + ?Sized>(state: &mut IncidentState, actor: &mut Actor, rng: &mut R) {
    actor.ap.refill();
    turn_start_context(state, actor);

    for _ in 0..REACTIVE_SAMPLES {
        if actor.ap.is_empty() {
            break;
        }
        let dir = Direction::SIDES[rng.gen_range(0..Direction::SIDES.len())];
        let next = actor.pos.step(dir);
        if !state.size().contains(next) {
            continue;
        }
        let reachable = state.connected(actor.pos, next);
        match state.fire_at(next) {
            FireState::Fire if reachable => {
                if !extinguish_fire(state, actor, next) {
                    fire_to_smoke(state, actor, next);
                }
            }
            FireState::Smoke if reachable => {
                remove_smoke(state, actor, next);
            }
            _ => {
                if try_move(state, actor, next) == MoveOutcome::Moved {
                    act_on_arrival(state, actor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActionPoints, AgentId};
    use crate::state::{ActionKind, RuleSet};
    use rand::SeedableRng;
    use rescue_logic::rules::PoiKind;
    use rand_chacha::ChaCha8Rng;
    use rescue_logic::scenario::ScenarioData;

    fn state() -> IncidentState {
        IncidentState::from_scenario(&ScenarioData::standard().unwrap(), RuleSet::default())
            .unwrap()
    }

    fn actor_at(cell: Cell, ap: u8) -> Actor {
        Actor {
            index: 0,
            id: AgentId(0),
            pos: cell,
            ap: ActionPoints::new(ap),
            carrying: false,
        }
    }

    #[test]
    fn test_search_graph_biases() {
        let s = state();
        let graph = SearchGraph::new(&s, false);
        let mut out = Vec::new();
        graph.edges(Cell::new(1, 2), &mut out);
        // (1,2): up (1,3) is fire and open; right (2,2) is a wall
        assert!(out.contains(&(Cell::new(1, 3), 2)));
        assert!(out.contains(&(Cell::new(2, 2), 1 + penalties::STANDING_WALL)));

        out.clear();
        graph.edges(Cell::new(6, 0), &mut out);
        assert!(out.contains(&(Cell::new(7, 0), 1 + penalties::CLOSED_DOOR)));
    }

    #[test]
    fn test_carrying_excludes_fire_edges() {
        let s = state();
        let graph = SearchGraph::new(&s, true);
        let mut out = Vec::new();
        graph.edges(Cell::new(0, 4), &mut out);
        assert!(out.iter().all(|&(cell, _)| cell != Cell::new(1, 4)));
    }

    #[test]
    fn test_carrier_heads_for_entry() {
        let s = state();
        let mut a = actor_at(Cell::new(4, 2), 4);
        a.carrying = true;
        assert_eq!(select_target(&s, &a), Some(Cell::new(7, 2)));
    }

    #[test]
    fn test_target_is_a_marker_when_any_is_reachable() {
        let s = state();
        let a = actor_at(Cell::new(0, 0), 4);
        let target = select_target(&s, &a).unwrap();
        assert!(s.pois().kind_at(target).is_some());
    }

    #[test]
    fn test_marker_ties_go_to_row_major_first() {
        let mut s = state();
        let markers: Vec<Cell> = s.pois().placed().map(|(cell, _)| cell).collect();
        for cell in markers {
            s.pois_mut().take(cell);
        }
        // both one step from (0,0); (1,0) comes first scanning rows
        s.pois_mut().place(Cell::new(0, 1), PoiKind::Victim);
        s.pois_mut().place(Cell::new(1, 0), PoiKind::FalseAlarm);
        let a = actor_at(Cell::new(0, 0), 4);
        assert_eq!(select_target(&s, &a), Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_goal_directed_turn_spends_ap_and_keeps_bounds() {
        let mut s = state();
        let mut a = actor_at(Cell::new(0, 0), 0);
        let mut plan = Plan::default();
        goal_directed_turn(&mut s, &mut a, &mut plan);
        assert!(a.ap.get() <= 8);
        assert!(a.ap.get() < 4 || a.pos != Cell::new(0, 0));
        assert!(s.size().contains(a.pos));
        assert_eq!(s.ledger(), s.ledger_totals());
    }

    #[test]
    fn test_goal_directed_reaches_adjacent_marker() {
        let mut s = state();
        // (0,0) -> (0,1) is open; (0,1) holds the false alarm
        let mut a = actor_at(Cell::new(0, 0), 0);
        let mut plan = Plan::default();
        goal_directed_turn(&mut s, &mut a, &mut plan);
        assert_eq!(s.tally().false_alarms_cleared, 1);
        assert_eq!(s.events().count(ActionKind::RemoveFalseAlarm), 1);
    }

    #[test]
    fn test_fallback_suppresses_neighbors() {
        let mut s = state();
        let mut a = actor_at(Cell::new(0, 4), 4);
        // (0,4) up -> (0,5) open, down -> (0,3) open, right -> (1,4) fire
        spend_on_neighbors(&mut s, &mut a);
        assert!(a.ap.get() < 4);
    }

    #[test]
    fn test_reactive_turn_is_deterministic() {
        let run = || {
            let mut s = state();
            let mut a = actor_at(Cell::new(0, 3), 0);
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            reactive_turn(&mut s, &mut a, &mut rng);
            (a, s.events().as_slice().to_vec())
        };
        let (a1, e1) = run();
        let (a2, e2) = run();
        assert_eq!(a1, a2);
        assert_eq!(e1, e2);
        assert!(a1.ap.get() <= 8);
    }

    #[test]
    fn test_policy_kind_parses() {
        assert_eq!("reactive".parse::<PolicyKind>(), Ok(PolicyKind::Reactive));
        assert_eq!("goal".parse::<PolicyKind>(), Ok(PolicyKind::GoalDirected));
        assert!("teleport".parse::<PolicyKind>().is_err());
    }
}
