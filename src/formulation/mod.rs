//! Translation of instance data into a routing model.
//!
//! - [`dimensions`] — `time`, `distance`, `order` and `quantity{i}` tracks plus vehicle costs
//! - [`time_windows`] — Stop windows, sticky vehicles, one disjunction per stop or pair
//! - [`breaks`] — Break position variables and their conditional timing constraints
//! - [`fleet`] — Loop-route and uniform-fleet readings
//! - [`strategy`] — First-solution strategy from those readings

pub mod breaks;
pub mod dimensions;
pub mod fleet;
pub mod strategy;
pub mod time_windows;

pub use breaks::add_breaks;
pub use dimensions::add_dimensions;
pub use fleet::{classify, FleetStructure};
pub use strategy::{select_metaheuristic, select_strategy};
pub use time_windows::{add_time_windows, DISJUNCTION_PENALTY};

use tracing::debug;

use crate::engine::{IntVar, RoutingModel, SearchParameters};
use crate::error::Result;
use crate::models::ProblemData;

/// A built model with what is needed to search and decode it.
pub struct Formulation<'a> {
    pub model: RoutingModel<'a>,
    /// Position variable of every break, in data order.
    pub breaks: Vec<IntVar>,
    pub fleet: FleetStructure,
    pub parameters: SearchParameters,
}

/// Builds the model of `data`.
///
/// The time limit and lambda coefficient of the returned parameters are
/// left at their defaults; monitors are not installed.
pub fn formulate(data: &ProblemData, nearby: bool) -> Result<Formulation<'_>> {
    let mut model = RoutingModel::new(data.num_model_nodes(), data.vehicles().len(), &data.starts_ends());
    add_dimensions(&mut model, data, nearby)?;

    let fleet = classify(data);
    debug!(loop_route = fleet.loop_route, uniform = fleet.uniform, "fleet structure");

    add_time_windows(&mut model, data)?;
    let breaks = if data.breaks().is_empty() {
        Vec::new()
    } else {
        add_breaks(&mut model, data)?
    };

    let strategy = select_strategy(!data.breaks().is_empty(), fleet);
    debug!(?strategy, "first solution strategy");
    let parameters = SearchParameters::default()
        .with_first_solution_strategy(strategy)
        .with_metaheuristic(select_metaheuristic());

    Ok(Formulation {
        model,
        breaks,
        fleet,
        parameters,
    })
}
