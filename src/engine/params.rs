//! Search parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Strategy used to build the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// Engine default: path cheapest arc.
    #[default]
    Automatic,
    /// Clarke-Wright savings.
    Savings,
    /// Cheapest insertion over all routes at once.
    ParallelCheapestInsertion,
}

/// Metaheuristic driving local search past local optima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocalSearchMetaheuristic {
    /// Stop at the first local optimum.
    GreedyDescent,
    #[default]
    GuidedLocalSearch,
}

/// Parameters of one solve call.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_vrptw::engine::{FirstSolutionStrategy, SearchParameters};
///
/// let params = SearchParameters::default()
///     .with_first_solution_strategy(FirstSolutionStrategy::Savings)
///     .with_time_limit(Duration::from_secs(2))
///     .with_solution_limit(500);
/// assert_eq!(params.time_limit, Some(Duration::from_secs(2)));
/// assert_eq!(params.solution_limit, Some(500));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub first_solution_strategy: FirstSolutionStrategy,
    pub local_search_metaheuristic: LocalSearchMetaheuristic,
    pub time_limit: Option<Duration>,
    /// Maximum number of accepted solutions, the first one included.
    pub solution_limit: Option<u64>,
    /// Penalization rounds of guided local search allowed in a row without
    /// a new best solution.
    pub max_stale_local_optima: u64,
    pub guided_local_search_lambda_coefficient: f64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::Automatic,
            local_search_metaheuristic: LocalSearchMetaheuristic::GuidedLocalSearch,
            time_limit: None,
            solution_limit: None,
            max_stale_local_optima: 100,
            guided_local_search_lambda_coefficient: 0.1,
        }
    }
}

impl SearchParameters {
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    pub fn with_metaheuristic(mut self, metaheuristic: LocalSearchMetaheuristic) -> Self {
        self.local_search_metaheuristic = metaheuristic;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    pub fn with_max_stale_local_optima(mut self, rounds: u64) -> Self {
        self.max_stale_local_optima = rounds;
        self
    }

    pub fn with_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.guided_local_search_lambda_coefficient = coefficient;
        self
    }
}
