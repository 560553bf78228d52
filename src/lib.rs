//! # u-vrptw
//!
//! Vehicle routing with time windows: a heterogeneous fleet serves stops
//! with optional time windows, service times, sticky vehicles and paired
//! alternative windows, and may have to fit rest breaks into its routes.
//!
//! [`solver::solve`] formulates an instance as dimensions, bounds and
//! disjunctions on a constraint-based routing engine, picks a construction
//! strategy from the fleet structure, and improves the first solution with
//! guided local search.
//!
//! ## Modules
//!
//! - [`models`] — Instance data (Node, Vehicle, Break, ProblemData) and decoded solutions
//! - [`distance`] — Per-profile travel time and distance matrices
//! - [`formulation`] — Dimensions, time windows, breaks, fleet classification, strategy selection
//! - [`solver`] — Solve orchestration and decoding
//! - [`engine`] — Routing model, expressions, dimensions, monitors and search
//! - [`evaluation`] — Plan scheduling and feasibility
//! - [`constructive`] — First-solution heuristics (savings, parallel insertion, cheapest arc)
//! - [`local_search`] — Neighborhood moves (relocate, exchange, 2-opt, or-opt, activation)
//! - [`config`] — Solver configuration
//! - [`error`] — Error types

pub mod config;
pub mod constructive;
pub mod distance;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod formulation;
pub mod local_search;
pub mod models;
pub mod solver;

pub use error::{Result, RoutingError};
