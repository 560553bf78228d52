//! Constraint-based routing engine.
//!
//! A [`RoutingModel`] holds cumulative [`Dimension`]s, disjunctions,
//! decision variables and [`Constraint`]s over [`Expr`]essions. Solving
//! builds a first solution with the configured [`FirstSolutionStrategy`],
//! improves it by local search under guided local search, and stops when a
//! [`SearchMonitor`] or the time limit says so.
//!
//! - [`expr`] — Variables, expressions and constraints
//! - [`dimension`] — Cumulative tracks with slack and soft bounds
//! - [`model`] — The model and its index layout
//! - [`monitor`] — Solution and no-improvement limits

mod assignment;
pub mod dimension;
pub mod expr;
mod guided_local_search;
pub mod model;
pub mod monitor;
mod params;
mod search;

pub use assignment::Assignment;
pub use dimension::{Dimension, SoftBound, Transit};
pub use expr::{Constraint, DimensionId, Expr, IntVar, VarValues};
pub use model::{Disjunction, RoutingModel};
pub use monitor::{NoImprovementLimit, SearchMonitor, SolutionLimit};
pub use params::{FirstSolutionStrategy, LocalSearchMetaheuristic, SearchParameters};

pub(crate) use model::Domain;
