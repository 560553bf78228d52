//! Solved assignments.

use super::expr::{DimensionId, IntVar};
use super::RoutingModel;
use crate::evaluation::{Evaluation, Plan, Values};

/// The best solution found by a search.
#[derive(Debug, Clone)]
pub struct Assignment {
    objective: i64,
    paths: Vec<Vec<usize>>,
    values: Values,
    tracked: Vec<IntVar>,
}

impl Assignment {
    pub(crate) fn new(model: &RoutingModel<'_>, plan: &Plan, evaluation: Evaluation) -> Self {
        Self {
            objective: evaluation.objective(),
            paths: (0..model.num_vehicles()).map(|v| plan.path(model, v)).collect(),
            values: evaluation.into_values(),
            tracked: model.tracked().to_vec(),
        }
    }

    pub fn objective_value(&self) -> i64 {
        self.objective
    }

    pub fn num_vehicles(&self) -> usize {
        self.paths.len()
    }

    /// Indices driven by `vehicle`, from its start index to its end index.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.paths[vehicle]
    }

    /// Resolved value of `var`. Decision variables are only reported when
    /// they were added to the assignment.
    pub fn value(&self, var: IntVar) -> Option<i64> {
        if matches!(var, IntVar::Decision(_)) && !self.tracked.contains(&var) {
            return None;
        }
        self.values.get(var)
    }

    pub fn cumul(&self, dimension: DimensionId, index: usize) -> Option<i64> {
        self.values.get(IntVar::Cumul { dimension, index })
    }
}
