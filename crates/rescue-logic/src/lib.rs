//! Pure rules for the fire-rescue incident simulation.
//!
//! This crate contains all game logic that is independent of the engine's
//! state store or any runtime. Functions take plain data and return results,
//! making them unit-testable and reusable from the engine and the headless
//! harness alike.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | AP economy, action costs, route penalties, end thresholds |
//! | [`geometry`] | Cells, wall sides, board bounds, dense per-cell `Grid<T>` |
//! | [`pathfinding`] | Min-queue, Dijkstra cost-to-goal and A* routing |
//! | [`rules`] | Fire/POI states, action-point budget, move costs, outcomes |
//! | [`scenario`] | Fixed seed layout and its validation |

pub mod constants;
pub mod geometry;
pub mod pathfinding;
pub mod rules;
pub mod scenario;
