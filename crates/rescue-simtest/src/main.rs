//! Rescue Headless Simulation Harness
//!
//! Runs one game from a seed and validates the engine tick by tick.
//! Runs entirely in-process - no rendering, no networking.
//!
//! Usage:
//!   cargo run -p rescue-simtest
//!   cargo run -p rescue-simtest -- --seed 7 --policy reactive --verbose
//!   cargo run -p rescue-simtest -- --json > final_state.json

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use rescue_core::prelude::*;
use rescue_core::systems::SearchGraph;
use rescue_logic::geometry::Direction;
use rescue_logic::pathfinding::{find_path, shortest_cost, CostGraph};
use rescue_logic::scenario::{DoorSpec, ScenarioData};

/// Headless fire-rescue simulation harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the simulation RNG
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Agent behavior: goal or reactive
    #[arg(long, default_value = "goal")]
    policy: PolicyKind,

    /// Stop after this many ticks even if the run has not ended
    #[arg(long, default_value_t = 500)]
    max_ticks: u64,

    /// Print the final state as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print every check and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Burned false alarms also leave the bag (legacy double count)
    #[arg(long)]
    legacy_false_alarms: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = SimConfig {
        seed: args.seed,
        policy: args.policy,
        rules: RuleSet {
            double_count_burned_false_alarms: args.legacy_false_alarms,
        },
        record_history: false,
    };

    // JSON goes to stdout; the report goes to stderr when it is requested
    let report = |line: String| {
        if args.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };

    report(format!(
        "=== Rescue Simulation Harness (seed {}, {:?}) ===\n",
        args.seed, args.policy
    ));

    let mut results = Vec::new();

    // 1. Scenario data validation
    results.extend(validate_scenario());

    // 2. Route planning on the standard board
    results.extend(validate_planning());

    // 3. Full run with per-tick invariants
    let (run_results, sim) = validate_run(config, args.max_ticks);
    results.extend(run_results);

    // 4. Replay determinism
    results.extend(validate_replay(config, sim.as_ref()));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    report(String::new());
    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            report(format!("  {} {}: {}", icon, r.name, r.detail));
        }
    }
    report(format!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    ));

    if args.json {
        if let Some(sim) = &sim {
            match serde_json::to_string_pretty(&sim.view()) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("could not serialize final state: {}", e),
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Scenario ─────────────────────────────────────────────────────────

fn validate_scenario() -> Vec<TestResult> {
    let mut results = Vec::new();

    let data = match ScenarioData::standard() {
        Ok(data) => data,
        Err(e) => {
            results.push(TestResult::new("scenario_load", false, e.to_string()));
            return results;
        }
    };
    results.push(TestResult::new(
        "scenario_load",
        true,
        format!(
            "'{}' {}x{}, {} doors, {} agents",
            data.name,
            data.width,
            data.height,
            data.doors.len(),
            data.crew_size()
        ),
    ));

    let mut short_row = data.clone();
    short_row.walls[0].pop();
    results.push(TestResult::new(
        "scenario_rejects_short_row",
        short_row.validate().is_err(),
        "wall row narrower than the board",
    ));

    let mut diagonal = data.clone();
    diagonal.doors.push(DoorSpec {
        a: Cell::new(0, 0),
        b: Cell::new(1, 1),
    });
    results.push(TestResult::new(
        "scenario_rejects_diagonal_door",
        diagonal.validate().is_err(),
        "door between non-adjacent cells",
    ));

    let mut overdrawn = data;
    overdrawn.total_victims = 0;
    results.push(TestResult::new(
        "scenario_rejects_overdrawn_pool",
        overdrawn.validate().is_err(),
        "more victims placed than exist",
    ));

    results
}

// ── 2. Planning ─────────────────────────────────────────────────────────

fn validate_planning() -> Vec<TestResult> {
    let mut results = Vec::new();
    let sim = match Simulation::new(SimConfig::default()) {
        Ok(sim) => sim,
        Err(e) => {
            results.push(TestResult::new("planning_setup", false, e.to_string()));
            return results;
        }
    };
    let state = sim.state();
    let graph = SearchGraph::new(state, false);

    // A* route cost must match Dijkstra for every pair from one corner
    let start = Cell::new(0, 0);
    let mut mismatches = Vec::new();
    let mut edges = Vec::new();
    for goal in state.size().cells() {
        let best = shortest_cost(&graph, start, goal);
        let routed = find_path(&graph, start, goal).map(|path| {
            let mut cost = 0;
            let mut at = start;
            for next in path {
                edges.clear();
                graph.edges(at, &mut edges);
                cost += edges
                    .iter()
                    .find(|(cell, _)| *cell == next)
                    .map_or(u32::MAX / 2, |(_, c)| *c);
                at = next;
            }
            cost
        });
        if best != routed {
            mismatches.push(format!("{}: {:?} vs {:?}", goal, best, routed));
        }
    }
    results.push(TestResult::new(
        "planning_astar_matches_dijkstra",
        mismatches.is_empty(),
        if mismatches.is_empty() {
            format!("{} goals agree", state.size().cell_count())
        } else {
            mismatches.join(", ")
        },
    ));

    results
}

// ── 3. Run ──────────────────────────────────────────────────────────────

fn structure_violations(state: &rescue_core::state::IncidentState) -> Vec<String> {
    let structure = state.structure();
    let size = state.size();
    let mut problems = Vec::new();
    for cell in size.cells() {
        for side in Direction::SIDES {
            let other = cell.step(side);
            if structure.damage_at(cell, side) > 2 {
                problems.push(format!("damage over 2 at {} {:?}", cell, side));
            }
            if size.contains(other)
                && structure.is_closed(cell, side) != structure.is_closed(other, side.opposite())
            {
                problems.push(format!("wall {} / {} disagrees", cell, other));
            }
        }
    }
    for door in structure.doors() {
        if structure.door_on(door.other, door.side.opposite()) != Some(door.cell) {
            problems.push(format!("door {} -> {} unmirrored", door.cell, door.other));
        }
    }
    problems
}

fn validate_run(config: SimConfig, max_ticks: u64) -> (Vec<TestResult>, Option<Simulation>) {
    let mut results = Vec::new();
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            results.push(TestResult::new("run_setup", false, e.to_string()));
            return (results, None);
        }
    };

    let totals = sim.state().ledger_totals();
    let mut ledger_breaks = Vec::new();
    let mut ap_breaks = Vec::new();
    let mut structure_breaks = Vec::new();
    let mut reverted = false;
    let mut ended_at = None;

    while sim.tick() < max_ticks && ended_at.is_none() {
        let report = sim.step();

        let ledger = sim.state().ledger();
        if ledger != totals && !config.rules.double_count_burned_false_alarms {
            ledger_breaks.push(format!("tick {}: {:?}", report.tick, ledger));
        }
        for agent in sim.agents() {
            if agent.ap > 8 {
                ap_breaks.push(format!("tick {}: agent {} AP {}", report.tick, agent.id, agent.ap));
            }
        }
        for problem in structure_violations(sim.state()) {
            structure_breaks.push(format!("tick {}: {}", report.tick, problem));
        }
        if report.outcome.is_some() {
            ended_at = Some(report.tick);
        }
    }
    if ended_at.is_some() {
        // one more tick must not revive the run
        sim.step();
        reverted = !sim.end_game();
    }

    let tally = sim.tally();
    results.push(TestResult::new(
        "run_conservation",
        ledger_breaks.is_empty(),
        if ledger_breaks.is_empty() {
            format!("victims/false alarms stayed at {:?}", totals)
        } else {
            ledger_breaks.join("; ")
        },
    ));
    results.push(TestResult::new(
        "run_ap_bounds",
        ap_breaks.is_empty(),
        if ap_breaks.is_empty() {
            "AP stayed within 0..=8".to_string()
        } else {
            ap_breaks.join("; ")
        },
    ));
    results.push(TestResult::new(
        "run_structure_mirrored",
        structure_breaks.is_empty(),
        if structure_breaks.is_empty() {
            format!("{} doors left, damage {}", sim.state().structure().door_count(), tally.damage)
        } else {
            structure_breaks.join("; ")
        },
    ));
    results.push(TestResult::new(
        "run_end_is_final",
        !reverted,
        match (ended_at, sim.outcome()) {
            (Some(tick), Some(outcome)) => format!(
                "{:?} at tick {} (rescued {}, lost {}, damage {})",
                outcome, tick, tally.rescued, tally.lost, tally.damage
            ),
            _ => format!(
                "no outcome within {} ticks (rescued {}, lost {}, damage {})",
                max_ticks, tally.rescued, tally.lost, tally.damage
            ),
        },
    ));

    (results, Some(sim))
}

// ── 4. Replay ───────────────────────────────────────────────────────────

fn validate_replay(config: SimConfig, finished: Option<&Simulation>) -> Vec<TestResult> {
    let Some(finished) = finished else {
        return Vec::new();
    };
    let ticks = finished.tick();

    let replay = Simulation::new(config).map(|mut sim| {
        for _ in 0..ticks {
            sim.step();
        }
        sim
    });
    let (same, detail) = match (replay, finished.state_bytes()) {
        (Ok(sim), Ok(expected)) => match sim.state_bytes() {
            Ok(bytes) => (
                bytes == expected && sim.events() == finished.events(),
                format!("{} ticks, {} state bytes", ticks, bytes.len()),
            ),
            Err(e) => (false, e.to_string()),
        },
        (Err(e), _) | (_, Err(e)) => (false, e.to_string()),
    };
    vec![TestResult::new("replay_byte_identical", same, detail)]
}
