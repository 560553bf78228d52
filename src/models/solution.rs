//! Decoded solution types.

use serde::Serialize;

/// One step of a decoded route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteStep {
    /// A visit to a matrix location (vehicle anchors included).
    Stop(usize),
    /// The rest break with this index in [`ProblemData::breaks`](super::ProblemData::breaks).
    Break(usize),
}

/// The ordered steps driven by one vehicle.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{PlannedRoute, RouteStep};
///
/// let route = PlannedRoute::new(0, vec![
///     RouteStep::Stop(0),
///     RouteStep::Stop(3),
///     RouteStep::Break(0),
///     RouteStep::Stop(0),
/// ]);
/// assert_eq!(route.locations(), vec![0, 3, 0]);
/// assert_eq!(route.breaks(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRoute {
    vehicle: usize,
    steps: Vec<RouteStep>,
}

impl PlannedRoute {
    pub fn new(vehicle: usize, steps: Vec<RouteStep>) -> Self {
        Self { vehicle, steps }
    }

    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Matrix locations in visit order, anchors included.
    pub fn locations(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                RouteStep::Stop(location) => Some(*location),
                RouteStep::Break(_) => None,
            })
            .collect()
    }

    /// Break indices in route order.
    pub fn breaks(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                RouteStep::Break(b) => Some(*b),
                RouteStep::Stop(_) => None,
            })
            .collect()
    }

    /// Number of stops between the two anchors.
    pub fn len(&self) -> usize {
        self.locations().len().saturating_sub(2)
    }

    /// Returns `true` if the vehicle serves no stop.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A solved instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    objective: i64,
    routes: Vec<PlannedRoute>,
    visited: Vec<Vec<usize>>,
    unperformed: Vec<usize>,
}

impl Solution {
    pub fn new(
        objective: i64,
        routes: Vec<PlannedRoute>,
        visited: Vec<Vec<usize>>,
        unperformed: Vec<usize>,
    ) -> Self {
        Self {
            objective,
            routes,
            visited,
            unperformed,
        }
    }

    /// Total objective value reported by the engine.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// One route per vehicle, in fleet order.
    pub fn routes(&self) -> &[PlannedRoute] {
        &self.routes
    }

    /// Stop indices visited by `vehicle`, in order.
    pub fn visited_stops(&self, vehicle: usize) -> &[usize] {
        &self.visited[vehicle]
    }

    /// Stop indices left unvisited.
    pub fn unperformed(&self) -> &[usize] {
        &self.unperformed
    }

    /// Number of stops served across all routes.
    pub fn num_served(&self) -> usize {
        self.visited.iter().map(Vec::len).sum()
    }
}

/// Result of one solve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SolveOutcome {
    Solved(Solution),
    /// The engine found no feasible assignment.
    NoSolution,
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoSolution => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}
