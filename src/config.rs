//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Search configuration for [`solve`](crate::solver::solve).
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use u_vrptw::config::SolverConfig;
///
/// let config = SolverConfig {
///     time_limit_ms: 500,
///     ..SolverConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert!(SolverConfig::default().validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds, `0` means no limit.
    pub time_limit_ms: u64,
    /// Non-improving solutions tolerated once a timeout window passes
    /// without a new best solution.
    pub no_improvement_limit: Option<u64>,
    /// Maximum number of accepted solutions.
    pub solution_limit: Option<u64>,
    /// Initial no-improvement window in milliseconds.
    pub initial_no_improvement_timeout_ms: u64,
    /// Growth factor applied to the window each time it elapses.
    pub timeout_multiplier: u32,
    /// Adds the `order` dimension favouring short segments.
    pub nearby: bool,
    /// Guided local search lambda coefficient.
    pub guided_local_search_lambda: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 0,
            no_improvement_limit: None,
            solution_limit: None,
            initial_no_improvement_timeout_ms: 30_000,
            timeout_multiplier: 2,
            nearby: false,
            guided_local_search_lambda: 0.1,
        }
    }
}

impl SolverConfig {
    /// Rejects configurations under which the search would never stop.
    pub fn validate(&self) -> Result<()> {
        let unbounded = |limit: Option<u64>| limit.is_none_or(|limit| limit == 0);
        if self.time_limit_ms == 0 && unbounded(self.no_improvement_limit) && unbounded(self.solution_limit) {
            return Err(RoutingError::NoStopCondition);
        }
        if self.timeout_multiplier < 1 {
            return Err(RoutingError::InvalidTimeoutMultiplier(self.timeout_multiplier));
        }
        Ok(())
    }

    /// Wall-clock budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_ms > 0).then(|| Duration::from_millis(self.time_limit_ms))
    }

    /// Initial no-improvement window.
    pub fn initial_no_improvement_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_no_improvement_timeout_ms)
    }
}
