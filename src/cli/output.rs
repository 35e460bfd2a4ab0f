//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ScenarioError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ScenarioError(ScenarioError::Parse(_)) => {
            format!("{}\nhint: see `ctxtree run --help` for the scenario file format", e)
        }
        _ => e.to_string(),
    }
}
