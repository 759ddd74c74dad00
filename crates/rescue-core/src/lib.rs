//! Rescue Core - Fire Rescue Incident Simulation Engine
//!
//! A turn-based simulation of a burning building: fire spreads, explodes
//! and weakens the structure while a crew of rescuers with a per-turn
//! action-point budget fights it and carries victims out.
//!
//! # Architecture
//!
//! - **State**: one owned [`state::IncidentState`] holding walls, doors,
//!   fire, points of interest, the running tally and the event log
//! - **Crew**: rescuers as `hecs` entities with pure-data components
//! - **Systems**: fire spread, the AP-gated action engine, decision
//!   policies and marker replenishment, all plain functions over the state
//! - **Engine**: [`engine::Simulation`], the one-agent-per-tick controller
//!
//! All randomness comes from one seeded `ChaCha8Rng`, so a seed and a
//! number of ticks reproduce a run exactly.
//!
//! # Example
//!
//! ```rust,no_run
//! use rescue_core::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! let ticks = sim.run_until_end(500);
//! println!("{} ticks, outcome {:?}", ticks, sim.outcome());
//! ```

pub mod components;
pub mod crew;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod systems;

pub use error::EngineError;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::crew::AgentView;
    pub use crate::engine::{SimConfig, Simulation, TickReport};
    pub use crate::error::EngineError;
    pub use crate::snapshot::{Snapshot, StateView};
    pub use crate::state::{ActionKind, Event, RuleSet, Tally};
    pub use crate::systems::PolicyKind;
    pub use rescue_logic::geometry::Cell;
    pub use rescue_logic::rules::{FireState, Outcome};
}
