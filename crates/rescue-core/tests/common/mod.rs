#![allow(dead_code)]

use rescue_core::crew::{Actor, Crew};
use rescue_core::prelude::*;
use rescue_core::state::IncidentState;
use rescue_logic::geometry::Direction;
use rescue_logic::scenario::{DoorSpec, ScenarioData};

/// A walled rectangle with no inner walls, one entry at the origin and a
/// single rescuer standing on it.
pub fn open_board(width: i32, height: i32) -> ScenarioData {
    let walls = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let mut bits = [0u8; 4];
                    bits[Direction::Up.index()] = u8::from(y == height - 1);
                    bits[Direction::Right.index()] = u8::from(x == width - 1);
                    bits[Direction::Down.index()] = u8::from(y == 0);
                    bits[Direction::Left.index()] = u8::from(x == 0);
                    bits
                })
                .collect()
        })
        .collect();
    ScenarioData {
        name: "test board".into(),
        width,
        height,
        walls,
        doors: Vec::new(),
        fire: Vec::new(),
        victims: Vec::new(),
        false_alarms: Vec::new(),
        entries: vec![Cell::new(0, 0)],
        crew_entries: vec![0],
        total_victims: 0,
        total_false_alarms: 0,
    }
}

/// Close the side between `a` and `b` on both faces.
pub fn close_between(data: &mut ScenarioData, a: Cell, b: Cell) {
    let side = a.direction_to(b).expect("cells must be adjacent");
    data.walls[a.y as usize][a.x as usize][side.index()] = 1;
    data.walls[b.y as usize][b.x as usize][side.opposite().index()] = 1;
}

/// Put a closed door between `a` and `b`.
pub fn door_between(data: &mut ScenarioData, a: Cell, b: Cell) {
    close_between(data, a, b);
    data.doors.push(DoorSpec { a, b });
}

pub fn build(data: &ScenarioData) -> (IncidentState, Crew) {
    let state = IncidentState::from_scenario(data, RuleSet::default()).expect("valid scenario");
    (state, Crew::spawn(data))
}

pub fn actor(crew: &Crew, ap: u8) -> Actor {
    let mut actor = crew.actor(0).expect("one rescuer");
    actor.ap = ActionPoints::new(ap);
    actor
}
