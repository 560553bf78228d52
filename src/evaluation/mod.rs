//! Plan scheduling and cost evaluation.
//!
//! - [`Plan`] — Interior indices visited by each vehicle
//! - [`Evaluator`] — Schedules every dimension and checks feasibility

mod evaluator;
mod plan;

pub use evaluator::{Evaluation, Evaluator, Mode, Values};
pub use plan::Plan;
