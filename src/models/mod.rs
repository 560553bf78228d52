//! Domain model types for time-windowed vehicle routing.
//!
//! Provides the instance data consumed by the formulation layer: stops with
//! time windows and sticky vehicles, a heterogeneous fleet, rest breaks, and
//! the decoded per-vehicle routes produced by a solve.

mod node;
mod problem;
mod solution;
mod vehicle;

pub use node::{Node, TimeWindow, UNBOUNDED};
pub use problem::{NodeRef, ProblemData, ScalingMaxima};
pub use solution::{PlannedRoute, RouteStep, Solution, SolveOutcome};
pub use vehicle::{Break, Capacity, Vehicle};
