//! Travel time and distance matrices.
//!
//! Provides dense integer matrices and per-profile matrix pairs.

mod matrix;

pub use matrix::{TravelMatrices, TravelMatrix};
