//! Engine error type

use rescue_logic::scenario::ScenarioError;
use thiserror::Error;

use crate::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
