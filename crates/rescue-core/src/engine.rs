//! Simulation engine - the turn controller and main entry point

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rescue_logic::geometry::Cell;
use rescue_logic::rules::Outcome;
use rescue_logic::scenario::ScenarioData;
use serde::{Deserialize, Serialize};

use crate::components::AgentId;
use crate::crew::{AgentView, Crew};
use crate::error::EngineError;
use crate::snapshot::{self, Snapshot, StateView};
use crate::state::{EventLog, IncidentState, RuleSet, Tally};
use crate::systems::{advance_fire, goal_directed_turn, reactive_turn, replenish_pois, PolicyKind};

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the single random stream behind fire, replenishment and
    /// reactive sampling.
    pub seed: u64,
    pub policy: PolicyKind,
    pub rules: RuleSet,
    /// Store a snapshot at the start of every tick.
    pub record_history: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            policy: PolicyKind::default(),
            rules: RuleSet::default(),
            record_history: true,
        }
    }
}

/// What one controller tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Agent that took its turn; `None` on an empty crew.
    pub agent: Option<AgentId>,
    /// Cell drawn by the fire advance.
    pub fire_cell: Cell,
    pub pois_placed: usize,
    pub outcome: Option<Outcome>,
}

/// Main simulation engine
pub struct Simulation {
    scenario: ScenarioData,
    config: SimConfig,
    state: IncidentState,
    crew: Crew,
    rng: ChaCha8Rng,
    /// Roster index of the agent whose turn is next.
    turn_index: usize,
    history: Vec<Snapshot>,
}

impl Simulation {
    /// Standard scenario with the given configuration.
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        Self::from_scenario(ScenarioData::standard()?, config)
    }

    /// Validate `scenario` and build a fresh run from it.
    pub fn from_scenario(scenario: ScenarioData, config: SimConfig) -> Result<Self, EngineError> {
        let state = IncidentState::from_scenario(&scenario, config.rules)?;
        let crew = Crew::spawn(&scenario);
        log::info!(
            "scenario '{}' ready: {} agents, seed {}, {:?} policy",
            scenario.name,
            crew.len(),
            config.seed,
            config.policy
        );
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scenario,
            config,
            state,
            crew,
            turn_index: 0,
            history: Vec::new(),
        })
    }

    /// Rebuild from the scenario and reseed. The scenario was validated on
    /// construction, so this cannot fail.
    pub fn reset(&mut self) {
        self.state = IncidentState::from_validated(&self.scenario, self.config.rules);
        self.crew = Crew::spawn(&self.scenario);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.turn_index = 0;
        self.history.clear();
        log::info!("simulation reset (seed {})", self.config.seed);
    }

    /// One controller tick: one agent's turn, one fire advance, one
    /// replenishment.
    pub fn step(&mut self) -> TickReport {
        if self.config.record_history {
            self.history.push(self.snapshot());
        }
        let tick = self.state.begin_step();

        let agent = self.take_turn();
        if !self.crew.is_empty() {
            self.turn_index = (self.turn_index + 1) % self.crew.len();
        }

        let fire_cell = advance_fire(&mut self.state, &mut self.crew, &mut self.rng);
        let pois_placed = replenish_pois(&mut self.state, &mut self.rng);
        let outcome = self.state.outcome();

        log::trace!(
            "tick {}: agent {:?}, fire at {}, {} placed, tally {:?}",
            tick,
            agent,
            fire_cell,
            pois_placed,
            self.state.tally()
        );
        if let Some(outcome) = outcome {
            log::info!("tick {}: run over ({:?})", tick, outcome);
        }

        TickReport {
            tick,
            agent,
            fire_cell,
            pois_placed,
            outcome,
        }
    }

    fn take_turn(&mut self) -> Option<AgentId> {
        let index = self.turn_index;
        let mut actor = self.crew.actor(index)?;
        match self.config.policy {
            PolicyKind::GoalDirected => {
                let mut plan = self.crew.take_plan(index);
                goal_directed_turn(&mut self.state, &mut actor, &mut plan);
                self.crew.put_plan(index, plan);
            }
            PolicyKind::Reactive => reactive_turn(&mut self.state, &mut actor, &mut self.rng),
        }
        self.crew.store(&actor);
        Some(actor.id)
    }

    /// Tick until the run ends or `max_ticks` have run. Returns the number
    /// of ticks executed by this call.
    pub fn run_until_end(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !self.end_game() {
            self.step();
            ran += 1;
        }
        ran
    }

    pub fn end_game(&self) -> bool {
        self.state.outcome().is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scenario(&self) -> &ScenarioData {
        &self.scenario
    }

    pub fn state(&self) -> &IncidentState {
        &self.state
    }

    pub fn tally(&self) -> Tally {
        self.state.tally()
    }

    pub fn events(&self) -> &EventLog {
        self.state.events()
    }

    pub fn agents(&self) -> Vec<AgentView> {
        self.crew.views()
    }

    /// Completed controller ticks.
    pub fn tick(&self) -> u64 {
        self.state.step()
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.state.step(), self.turn_index, &self.state, &self.crew)
    }

    /// Encoded current snapshot, for byte-level replay comparison.
    pub fn state_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(snapshot::encode(&self.snapshot())?)
    }

    pub fn view(&self) -> StateView {
        StateView::from_snapshot(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_simulation() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.agents().len(), 6);
        assert!(!sim.end_game());
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_step_rotates_one_agent_per_tick() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let first = sim.step();
        assert_eq!(first.tick, 1);
        assert_eq!(first.agent, Some(AgentId(0)));
        assert_eq!(sim.step().agent, Some(AgentId(1)));
        assert_eq!(sim.turn_index(), 2);
        assert_eq!(sim.history().len(), 2);
        assert_eq!(sim.history()[0].tick, 0);
        assert_eq!(sim.history()[1].tick, 1);
    }

    #[test]
    fn test_round_robin_wraps() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        for _ in 0..6 {
            sim.step();
        }
        assert_eq!(sim.turn_index(), 0);
    }

    #[test]
    fn test_history_can_be_disabled() {
        let config = SimConfig {
            record_history: false,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.step();
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let initial = sim.state_bytes().unwrap();
        for _ in 0..10 {
            sim.step();
        }
        sim.reset();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.turn_index(), 0);
        assert!(sim.events().is_empty());
        assert_eq!(sim.state_bytes().unwrap(), initial);
    }

    #[test]
    fn test_run_until_end_respects_limit() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let ran = sim.run_until_end(5);
        assert!(ran <= 5);
        assert_eq!(sim.tick(), ran);
    }

    #[test]
    fn test_invalid_scenario_fails_construction() {
        let mut data = ScenarioData::standard().unwrap();
        data.walls.pop();
        assert!(matches!(
            Simulation::from_scenario(data, SimConfig::default()),
            Err(EngineError::Scenario(_))
        ));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: SimConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert!(config.record_history);
        assert_eq!(config.policy, PolicyKind::GoalDirected);
    }
}
