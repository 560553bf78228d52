//! Cumulative dimensions.
//!
//! A dimension accumulates a quantity along each route. At every index it
//! carries a cumul value and a slack, linked by
//!
//! ```text
//! cumul(next) = cumul(i) + slack(i) + transit(i, next)
//! ```
//!
//! Cumul values are bounded per index; an index may also carry a
//! [`SoftBound`] whose excess is charged instead of forbidden.

use serde::{Deserialize, Serialize};

/// Transit callback over model node ids.
pub type Transit<'a> = Box<dyn Fn(usize, usize) -> i64 + 'a>;

/// A soft upper bound: `(cumul - threshold) * penalty` is charged when the
/// cumul exceeds `threshold`.
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::SoftBound;
///
/// let bound = SoftBound::new(100, 3);
/// assert_eq!(bound.cost(90), 0);
/// assert_eq!(bound.cost(110), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftBound {
    pub threshold: i64,
    pub penalty: i64,
}

impl SoftBound {
    pub fn new(threshold: i64, penalty: i64) -> Self {
        Self { threshold, penalty }
    }

    /// Penalty charged for a cumul value.
    pub fn cost(&self, cumul: i64) -> i64 {
        if cumul > self.threshold {
            cumul.saturating_sub(self.threshold).saturating_mul(self.penalty)
        } else {
            0
        }
    }
}

/// A named cumulative track.
pub struct Dimension<'a> {
    name: String,
    transits: Vec<Transit<'a>>,
    vehicle_transit: Vec<usize>,
    slack_max: i64,
    capacity: i64,
    fix_start_cumul_to_zero: bool,
    span_cost: Vec<i64>,
    cumul_min: Vec<i64>,
    cumul_max: Vec<i64>,
    soft_upper: Vec<Option<SoftBound>>,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl<'a> Dimension<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        transits: Vec<Transit<'a>>,
        vehicle_transit: Vec<usize>,
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        num_indices: usize,
        starts: Vec<usize>,
        ends: Vec<usize>,
    ) -> Self {
        let num_vehicles = vehicle_transit.len();
        Self {
            name,
            transits,
            vehicle_transit,
            slack_max,
            capacity,
            fix_start_cumul_to_zero,
            span_cost: vec![0; num_vehicles],
            cumul_min: vec![0; num_indices],
            cumul_max: vec![capacity; num_indices],
            soft_upper: vec![None; num_indices],
            starts,
            ends,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn fix_start_cumul_to_zero(&self) -> bool {
        self.fix_start_cumul_to_zero
    }

    /// Transit of `vehicle` between two model nodes.
    pub fn transit(&self, vehicle: usize, from_node: usize, to_node: usize) -> i64 {
        (self.transits[self.vehicle_transit[vehicle]])(from_node, to_node)
    }

    pub fn cumul_min(&self, index: usize) -> i64 {
        self.cumul_min[index]
    }

    pub fn cumul_max(&self, index: usize) -> i64 {
        self.cumul_max[index]
    }

    pub fn soft_upper_bound(&self, index: usize) -> Option<SoftBound> {
        self.soft_upper[index]
    }

    pub fn span_cost_coefficient(&self, vehicle: usize) -> i64 {
        self.span_cost[vehicle]
    }

    /// Returns `true` if any vehicle pays for the span of this dimension.
    pub fn has_span_cost(&self) -> bool {
        self.span_cost.iter().any(|&c| c != 0)
    }

    /// Raises the lower bound of the cumul at `index`.
    pub fn set_cumul_min(&mut self, index: usize, value: i64) {
        self.cumul_min[index] = self.cumul_min[index].max(value);
    }

    /// Lowers the upper bound of the cumul at `index`.
    pub fn set_cumul_max(&mut self, index: usize, value: i64) {
        self.cumul_max[index] = self.cumul_max[index].min(value);
    }

    pub fn set_cumul_range(&mut self, index: usize, min: i64, max: i64) {
        self.set_cumul_min(index, min);
        self.set_cumul_max(index, max);
    }

    pub fn set_soft_upper_bound(&mut self, index: usize, bound: SoftBound) {
        self.soft_upper[index] = Some(bound);
    }

    pub fn set_start_cumul_min(&mut self, vehicle: usize, value: i64) {
        let index = self.starts[vehicle];
        self.set_cumul_min(index, value);
    }

    pub fn set_end_cumul_max(&mut self, vehicle: usize, value: i64) {
        let index = self.ends[vehicle];
        self.set_cumul_max(index, value);
    }

    pub fn set_end_soft_upper_bound(&mut self, vehicle: usize, bound: SoftBound) {
        let index = self.ends[vehicle];
        self.set_soft_upper_bound(index, bound);
    }

    pub fn set_span_cost_coefficient_for_vehicle(&mut self, coefficient: i64, vehicle: usize) {
        self.span_cost[vehicle] = coefficient;
    }

    pub fn set_span_cost_coefficient_for_all_vehicles(&mut self, coefficient: i64) {
        self.span_cost.fill(coefficient);
    }
}

impl std::fmt::Debug for Dimension<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name)
            .field("slack_max", &self.slack_max)
            .field("capacity", &self.capacity)
            .field("fix_start_cumul_to_zero", &self.fix_start_cumul_to_zero)
            .field("span_cost", &self.span_cost)
            .finish_non_exhaustive()
    }
}
