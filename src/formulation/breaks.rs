//! Rest break placement.
//!
//! A required break of vehicle `v` is placed after one of the visits of
//! `v`, or at one of its anchors, through a position variable whose value is
//! the model index the break follows. The break lengthens the `time` slack
//! at that index by its duration plus any wait for its window to open.

use super::dimensions::TIME;
use crate::engine::{Constraint, Expr, IntVar, RoutingModel};
use crate::error::{Result, RoutingError};
use crate::models::{Break, ProblemData};

/// Adds one position variable per break, in data order.
///
/// A break that is not required is pinned to `-1`.
pub fn add_breaks(model: &mut RoutingModel<'_>, data: &ProblemData) -> Result<Vec<IntVar>> {
    let mut positions = Vec::with_capacity(data.breaks().len());
    for (b, rest) in data.breaks().iter().enumerate() {
        let vehicle = rest.vehicle();
        if vehicle >= model.num_vehicles() {
            return Err(RoutingError::VehicleOutOfRange {
                vehicle,
                vehicles: model.num_vehicles(),
            });
        }

        let position = model.new_int_var(-1, i64::MAX, &format!("break {b} position"));
        positions.push(position);
        if rest.is_required() {
            let candidates: Vec<usize> = (0..model.num_interior())
                .chain([model.start(vehicle), model.end(vehicle)])
                .collect();
            for &index in &candidates {
                place_after(model, data, rest, position, index)?;
            }
            model.set_values(position, candidates.into_iter().map(|i| i as i64).collect())?;
        } else {
            model.set_values(position, vec![-1])?;
        }
        model.add_variable_minimized_by_finalizer(position);
        model.add_to_assignment(position);
    }
    Ok(positions)
}

fn place_after(
    model: &mut RoutingModel<'_>,
    data: &ProblemData,
    rest: &Break,
    position: IntVar,
    index: usize,
) -> Result<()> {
    let vehicle = rest.vehicle();
    let cumul = model.cumul_var(TIME, index)?;
    let service = data.node_service_time(model.index_to_node(index));
    let slack = if model.is_end(index) {
        model.new_int_var(0, i64::MAX, "end slack")
    } else {
        model.slack_var(TIME, index)?
    };
    if model.is_start(index) {
        if let Some(start) = data.vehicles()[vehicle].time_start() {
            model.add_constraint(Constraint::GreaterOrEqual(cumul.into(), start.into()));
        }
    }

    let here = || Expr::var(position).is_equal(index as i64);

    // off this vehicle the index is forbidden; on it the break must be placed
    let forbidden = Expr::conditional(
        Expr::var(model.vehicle_var(index)?).is_different(vehicle as i64),
        Expr::constant(index as i64),
        Expr::constant(-1),
    );
    model.add_constraint(Constraint::NotEqual(position.into(), forbidden));

    let done = Expr::var(cumul) + Expr::constant(service);
    let duration = Expr::conditional(here(), rest.duration().into(), Expr::constant(0));
    let needed = match rest.time_window().ready() {
        Some(start) => {
            let wait = Expr::conditional(
                here(),
                (Expr::constant(start) - done.clone()).max(Expr::constant(0)),
                Expr::constant(0),
            );
            model.add_variable_minimized_by_finalizer(wait.clone());
            wait + duration
        }
        None => duration,
    };
    if let Some(end) = rest.time_window().due() {
        let upper = Expr::conditional(here(), end.into(), i64::MAX.into());
        model.add_constraint(Constraint::LessOrEqual(done, upper));
    }
    model.add_constraint(Constraint::GreaterOrEqual(slack.into(), needed));
    Ok(())
}
