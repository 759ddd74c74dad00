//! Action engine - AP-gated rescuer actions.
//!
//! Every function works on an [`Actor`] working copy. A failed attempt
//! changes nothing and returns `false` / [`MoveOutcome::Blocked`]; every
//! success appends one event (wall breaching appends one per hit).

use rescue_logic::constants::costs;
use rescue_logic::geometry::Cell;
use rescue_logic::rules::{self, FireState, PoiKind};

use crate::crew::Actor;
use crate::state::{ActionKind, IncidentState, WallHit};

/// Result of one [`try_move`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent now stands on the target.
    Moved,
    /// A closed door was opened; the agent has not moved yet.
    DoorOpened,
    Blocked,
}

/// Step onto an adjacent cell, opening or breaching what is in the way.
///
/// Checks run in order and stop at the first failure:
/// 1. the step has a cost (no carrying into fire);
/// 2. stepping into fire leaves [`costs::FIRE_RESERVE`] AP;
/// 3. a closed door is opened for [`costs::OPEN_DOOR`] AP, ending the call;
/// 4. a standing wall is hit for [`costs::HIT_WALL`] AP per hit while
///    affordable, and must have come down;
/// 5. the move cost is paid.
pub fn try_move(state: &mut IncidentState, actor: &mut Actor, target: Cell) -> MoveOutcome {
    let from = actor.pos;
    if from.direction_to(target).is_none() {
        return MoveOutcome::Blocked;
    }
    if !state.size().contains(target) {
        return MoveOutcome::Blocked;
    }
    let Some(cost) = rules::move_cost(state.fire_at(target), actor.carrying) else {
        return MoveOutcome::Blocked;
    };
    if state.fire_at(target) == FireState::Fire && !actor.ap.can_spend(cost + costs::FIRE_RESERVE)
    {
        return MoveOutcome::Blocked;
    }

    if state.structure().closed_door_between(from, target) {
        return if open_door(state, actor, target) {
            MoveOutcome::DoorOpened
        } else {
            MoveOutcome::Blocked
        };
    }

    if state.structure().standing_wall_between(from, target) {
        while hit_wall(state, actor, target).is_some() {}
        if state.structure().standing_wall_between(from, target) {
            return MoveOutcome::Blocked;
        }
    }

    if !actor.ap.spend(cost) {
        return MoveOutcome::Blocked;
    }
    actor.pos = target;
    state.log(Some(actor.id), ActionKind::Move, target, Some(from));
    log::debug!("agent {} moved {} -> {} ({} AP left)", actor.id, from, target, actor.ap.get());
    MoveOutcome::Moved
}

/// Open the closed door between the agent and `target`.
pub fn open_door(state: &mut IncidentState, actor: &mut Actor, target: Cell) -> bool {
    if !state.structure().closed_door_between(actor.pos, target)
        || !actor.ap.can_spend(costs::OPEN_DOOR)
    {
        return false;
    }
    if !state.structure_mut().open_door(actor.pos, target) {
        return false;
    }
    actor.ap.spend(costs::OPEN_DOOR);
    state.log(Some(actor.id), ActionKind::OpenDoor, actor.pos, Some(target));
    log::debug!("agent {} opened door {} -> {}", actor.id, actor.pos, target);
    true
}

/// One hit on the standing wall between the agent and `target`.
pub fn hit_wall(state: &mut IncidentState, actor: &mut Actor, target: Cell) -> Option<WallHit> {
    let side = actor.pos.direction_to(target)?;
    if !state.structure().standing_wall_between(actor.pos, target)
        || !actor.ap.can_spend(costs::HIT_WALL)
    {
        return None;
    }
    actor.ap.spend(costs::HIT_WALL);
    state.strike_wall(actor.pos, side, Some(actor.id))
}

/// The agent's own cell, or a neighbor it can reach without a closed side.
fn within_reach(state: &IncidentState, actor: &Actor, cell: Cell) -> bool {
    cell == actor.pos || state.connected(actor.pos, cell)
}

fn change_fire(
    state: &mut IncidentState,
    actor: &mut Actor,
    cell: Cell,
    expect: FireState,
    into: FireState,
    cost: u8,
    action: ActionKind,
) -> bool {
    if !within_reach(state, actor, cell) || state.fire_at(cell) != expect {
        return false;
    }
    if !actor.ap.spend(cost) {
        return false;
    }
    state.set_fire(cell, into);
    state.log(Some(actor.id), action, cell, None);
    log::debug!("agent {} {:?} at {}", actor.id, action, cell);
    true
}

/// Fire to clear, 2 AP.
pub fn extinguish_fire(state: &mut IncidentState, actor: &mut Actor, cell: Cell) -> bool {
    change_fire(
        state,
        actor,
        cell,
        FireState::Fire,
        FireState::Clear,
        costs::EXTINGUISH,
        ActionKind::ExtinguishFire,
    )
}

/// Fire to smoke, 1 AP.
pub fn fire_to_smoke(state: &mut IncidentState, actor: &mut Actor, cell: Cell) -> bool {
    change_fire(
        state,
        actor,
        cell,
        FireState::Fire,
        FireState::Smoke,
        costs::FIRE_TO_SMOKE,
        ActionKind::FireToSmoke,
    )
}

/// Smoke to clear, 1 AP.
pub fn remove_smoke(state: &mut IncidentState, actor: &mut Actor, cell: Cell) -> bool {
    change_fire(
        state,
        actor,
        cell,
        FireState::Smoke,
        FireState::Clear,
        costs::CLEAR_SMOKE,
        ActionKind::RemoveSmoke,
    )
}

/// Lift the victim marker on the agent's own cell.
pub fn pick_up_victim(state: &mut IncidentState, actor: &mut Actor) -> bool {
    let cell = actor.pos;
    if actor.carrying
        || state.pois().kind_at(cell) != Some(PoiKind::Victim)
        || state.fire_at(cell) == FireState::Fire
    {
        return false;
    }
    state.pois_mut().take(cell);
    state.pois_mut().victim_picked_up();
    actor.carrying = true;
    state.log(Some(actor.id), ActionKind::PickUpVictim, cell, None);
    log::debug!("agent {} picked up victim at {}", actor.id, cell);
    true
}

/// Hand a carried victim over at an entry.
pub fn drop_off_victim(state: &mut IncidentState, actor: &mut Actor) -> bool {
    let cell = actor.pos;
    if !actor.carrying || !state.is_entry(cell) || state.fire_at(cell) == FireState::Fire {
        return false;
    }
    actor.carrying = false;
    state.pois_mut().victim_left_board();
    state.tally_mut().rescued += 1;
    state.log(Some(actor.id), ActionKind::DropOffVictim, cell, None);
    log::info!(
        "agent {} rescued a victim at {} ({} rescued)",
        actor.id,
        cell,
        state.tally().rescued
    );
    true
}

/// Turn over a false alarm on the agent's own cell.
pub fn reveal_false_alarm(state: &mut IncidentState, actor: &mut Actor) -> bool {
    let cell = actor.pos;
    if state.pois().kind_at(cell) != Some(PoiKind::FalseAlarm) {
        return false;
    }
    state.pois_mut().take(cell);
    state.tally_mut().false_alarms_cleared += 1;
    state.log(Some(actor.id), ActionKind::RemoveFalseAlarm, cell, None);
    log::debug!("agent {} cleared false alarm at {}", actor.id, cell);
    true
}

/// Free actions on the current cell: pick up, reveal, drop off.
pub fn turn_start_context(state: &mut IncidentState, actor: &mut Actor) {
    pick_up_victim(state, actor);
    reveal_false_alarm(state, actor);
    drop_off_victim(state, actor);
}

/// Follow-up after stepping onto a cell: suppress what is burning there,
/// then the free actions.
pub fn act_on_arrival(state: &mut IncidentState, actor: &mut Actor) {
    let here = actor.pos;
    match state.fire_at(here) {
        FireState::Fire => {
            if actor.ap.can_spend(costs::EXTINGUISH) {
                extinguish_fire(state, actor, here);
            } else {
                fire_to_smoke(state, actor, here);
            }
        }
        FireState::Smoke => {
            remove_smoke(state, actor, here);
        }
        FireState::Clear => {}
    }
    turn_start_context(state, actor);
}
