//! Error types.

use thiserror::Error;

/// Errors raised while configuring or building a routing model.
///
/// An instance for which no feasible assignment exists is not an error; it
/// is reported as [`SolveOutcome::NoSolution`](crate::models::SolveOutcome).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("unknown dimension `{0}`")]
    UnknownDimension(String),

    #[error("index {index} is out of range for a model of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("vehicle {vehicle} is out of range for a fleet of {vehicles}")]
    VehicleOutOfRange { vehicle: usize, vehicles: usize },

    #[error("expected one transit per vehicle ({expected}), got {found}")]
    TransitCount { expected: usize, found: usize },

    #[error("`{0}` is not a decision variable of this model")]
    NotADecisionVariable(String),

    #[error("no stop condition: set a time limit or a no-improvement limit")]
    NoStopCondition,

    #[error("timeout multiplier must be at least 1, got {0}")]
    InvalidTimeoutMultiplier(u32),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
