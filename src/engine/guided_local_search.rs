//! Guided local search.
//!
//! # Algorithm
//!
//! At every local optimum the arcs of the current plan are scored by their
//! utility
//!
//! ```text
//! util(a, b) = cost(a, b) / (1 + penalty(a, b))
//! ```
//!
//! and the arcs of maximum utility have their penalty incremented. Local
//! search then minimizes the augmented objective
//!
//! ```text
//! objective + lambda * sum of penalties of used arcs
//! ```
//!
//! with `lambda` fixed at the first local optimum as the coefficient times
//! the average arc cost of that plan.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use tracing::debug;

use super::RoutingModel;
use crate::evaluation::Plan;

/// Arc penalties and the lambda factor.
#[derive(Debug, Clone)]
pub(crate) struct GuidedLocalSearch {
    penalties: Vec<u32>,
    size: usize,
    coefficient: f64,
    lambda: Option<i64>,
}

impl GuidedLocalSearch {
    pub(crate) fn new(num_indices: usize, coefficient: f64) -> Self {
        Self {
            penalties: vec![0; num_indices * num_indices],
            size: num_indices,
            coefficient,
            lambda: None,
        }
    }

    fn penalty(&self, from: usize, to: usize) -> u32 {
        self.penalties[from * self.size + to]
    }

    /// Penalty term added to the objective of `plan`.
    pub(crate) fn penalty_cost(&self, model: &RoutingModel<'_>, plan: &Plan) -> i64 {
        let Some(lambda) = self.lambda else {
            return 0;
        };
        let total: i64 = plan
            .arcs(model)
            .into_iter()
            .map(|(_, a, b)| i64::from(self.penalty(a, b)))
            .sum();
        lambda.saturating_mul(total)
    }

    /// Penalizes the arcs of maximum utility in `plan`.
    ///
    /// Returns `false` when no arc has a positive utility, i.e. the search
    /// cannot be diversified any further.
    pub(crate) fn penalize(&mut self, model: &RoutingModel<'_>, plan: &Plan) -> bool {
        let arcs: Vec<(usize, usize, i64)> = plan
            .arcs(model)
            .into_iter()
            .map(|(v, a, b)| (a, b, model.arc_cost(v, a, b)))
            .collect();
        if arcs.is_empty() {
            return false;
        }

        if self.lambda.is_none() {
            let total: f64 = arcs.iter().map(|&(_, _, c)| c as f64).sum();
            let average = total / arcs.len() as f64;
            let lambda = ((self.coefficient * average).round() as i64).max(1);
            debug!(lambda, "guided local search lambda fixed");
            self.lambda = Some(lambda);
        }

        let utility = |a: usize, b: usize, cost: i64| cost as f64 / (1.0 + f64::from(self.penalty(a, b)));
        let max_utility = arcs
            .iter()
            .map(|&(a, b, c)| utility(a, b, c))
            .fold(f64::NEG_INFINITY, f64::max);
        if max_utility <= 0.0 {
            return false;
        }

        let chosen: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|&&(a, b, c)| (utility(a, b, c) - max_utility).abs() < 1e-9)
            .map(|&(a, b, _)| (a, b))
            .collect();
        for (a, b) in chosen {
            let slot = &mut self.penalties[a * self.size + b];
            *slot = slot.saturating_add(1);
        }
        true
    }
}
