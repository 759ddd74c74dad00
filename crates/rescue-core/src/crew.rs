//! Crew roster - rescuer entities in a `hecs::World`.
//!
//! Turn order is spawn order, kept in `roster`. Systems never hold a world
//! borrow across an action: they load an [`Actor`] working copy, run the
//! turn, then [`Crew::store`] writes it back in one go.

use hecs::{Entity, World};
use rescue_logic::geometry::Cell;
use rescue_logic::scenario::ScenarioData;
use serde::{Deserialize, Serialize};

use crate::components::{ActionPoints, AgentId, Carrying, Firefighter, Plan, Position};

/// Working copy of one rescuer for the duration of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub index: usize,
    pub id: AgentId,
    pub pos: Cell,
    pub ap: ActionPoints,
    pub carrying: bool,
}

/// Read-only view of a rescuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub pos: Cell,
    pub ap: u8,
    pub carrying: bool,
}

pub struct Crew {
    world: World,
    roster: Vec<Entity>,
}

impl Crew {
    /// Spawn one rescuer per `crew_entries` slot, standing on that entry.
    pub fn spawn(data: &ScenarioData) -> Self {
        let mut world = World::new();
        let mut roster = Vec::with_capacity(data.crew_entries.len());
        for (i, &entry) in data.crew_entries.iter().enumerate() {
            let Some(&cell) = data.entries.get(entry) else {
                continue;
            };
            let entity = world.spawn((
                Firefighter {
                    id: AgentId(i as u8),
                },
                Position(cell),
                ActionPoints::new(0),
                Carrying(false),
                Plan::default(),
            ));
            roster.push(entity);
        }
        Self { world, roster }
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn actor(&self, index: usize) -> Option<Actor> {
        let entity = *self.roster.get(index)?;
        let mut query = self
            .world
            .query_one::<(&Firefighter, &Position, &ActionPoints, &Carrying)>(entity)
            .ok()?;
        let (ff, pos, ap, carrying) = query.get()?;
        Some(Actor {
            index,
            id: ff.id,
            pos: pos.0,
            ap: *ap,
            carrying: carrying.0,
        })
    }

    pub fn store(&mut self, actor: &Actor) {
        let Some(&entity) = self.roster.get(actor.index) else {
            return;
        };
        if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
            pos.0 = actor.pos;
        }
        if let Ok(mut ap) = self.world.get::<&mut ActionPoints>(entity) {
            *ap = actor.ap;
        }
        if let Ok(mut carrying) = self.world.get::<&mut Carrying>(entity) {
            carrying.0 = actor.carrying;
        }
    }

    /// Move the agent's plan out of the world; put it back with [`Crew::put_plan`].
    pub fn take_plan(&mut self, index: usize) -> Plan {
        let Some(&entity) = self.roster.get(index) else {
            return Plan::default();
        };
        self.world
            .get::<&mut Plan>(entity)
            .map(|mut plan| std::mem::take(&mut *plan))
            .unwrap_or_default()
    }

    pub fn put_plan(&mut self, index: usize, plan: Plan) {
        if let Some(&entity) = self.roster.get(index) {
            if let Ok(mut slot) = self.world.get::<&mut Plan>(entity) {
                *slot = plan;
            }
        }
    }

    pub fn plan(&self, index: usize) -> Option<Plan> {
        let entity = *self.roster.get(index)?;
        self.world.get::<&Plan>(entity).ok().map(|p| (*p).clone())
    }

    /// Roster indices of agents standing on `cell`, in turn order.
    pub fn at(&self, cell: Cell) -> Vec<usize> {
        self.roster
            .iter()
            .enumerate()
            .filter(|&(_, &e)| {
                self.world
                    .get::<&Position>(e)
                    .is_ok_and(|pos| pos.0 == cell)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Pending routes in turn order.
    pub fn plans(&self) -> Vec<Plan> {
        (0..self.len()).filter_map(|i| self.plan(i)).collect()
    }

    pub fn views(&self) -> Vec<AgentView> {
        (0..self.len())
            .filter_map(|i| self.actor(i))
            .map(|a| AgentView {
                id: a.id,
                pos: a.pos,
                ap: a.ap.get(),
                carrying: a.carrying,
            })
            .collect()
    }
}
