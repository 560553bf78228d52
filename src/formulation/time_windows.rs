//! Stop time windows, sticky vehicles and visit disjunctions.

use tracing::{trace, warn};

use super::dimensions::TIME;
use crate::engine::{RoutingModel, SoftBound};
use crate::error::Result;
use crate::models::{Node, ProblemData};

/// Penalty for leaving a stop unserved.
///
/// It dominates any realistic route cost, so a stop is only dropped when
/// no feasible route can serve it.
pub const DISJUNCTION_PENALTY: i64 = 1 << 52;

/// Instance-scaled estimate of the largest cost a single stop can add.
///
/// Only used to detect instances on which [`DISJUNCTION_PENALTY`] may no
/// longer dominate.
pub fn penalty_estimate(data: &ProblemData) -> i64 {
    let m = data.scaling_maxima();
    let per_arc = m
        .max_time
        .saturating_mul(2)
        .saturating_add(m.max_service_time)
        .saturating_mul(m.max_time_cost)
        .saturating_add(m.max_distance.saturating_mul(2).saturating_mul(m.max_distance_cost));
    let size = data.matrix_size() as i64;
    let windows = data.nodes().iter().filter(|n| !n.time_window().is_open()).count() as i64;
    let breaks = if data.breaks().is_empty() { 1 } else { 50_000 };
    per_arc
        .saturating_mul(size.saturating_mul(size).saturating_add(windows.saturating_mul(windows)))
        .saturating_mul(breaks)
}

/// Stops `i` and `i + 1` are alternatives when they share a location.
fn partner(nodes: &[Node], i: usize) -> Option<usize> {
    let next = nodes.get(i + 1)?;
    nodes[i].shares_location(next).then_some(i + 1)
}

fn bound_time(model: &mut RoutingModel<'_>, index: usize, node: &Node) -> Result<()> {
    let window = node.time_window();
    let time = model.dimension_mut(TIME)?;
    if let Some(ready) = window.ready() {
        time.set_cumul_min(index, ready);
    }
    if let Some(due) = window.due() {
        match node.late_multiplier().filter(|&m| m > 0) {
            Some(multiplier) => time.set_soft_upper_bound(index, SoftBound::new(due, multiplier)),
            None => time.set_cumul_max(index, due),
        }
    }
    Ok(())
}

fn restrict_vehicles(model: &mut RoutingModel<'_>, index: usize, allowed: &[usize]) -> Result<()> {
    if allowed.is_empty() {
        return Ok(());
    }
    for v in 0..model.num_vehicles() {
        if !allowed.contains(&v) {
            model.remove_vehicle(index, v)?;
        }
    }
    Ok(())
}

/// Applies stop time windows and vehicle restrictions and adds one
/// disjunction per stop or pair of alternative stops.
///
/// The second stop of a pair is restricted to the first stop's vehicles.
/// When it lists vehicles of its own, those restrict it further, so it
/// only accepts vehicles present in both lists.
pub fn add_time_windows(model: &mut RoutingModel<'_>, data: &ProblemData) -> Result<()> {
    let estimate = penalty_estimate(data);
    if estimate > DISJUNCTION_PENALTY {
        warn!(
            estimate,
            penalty = DISJUNCTION_PENALTY,
            "disjunction penalty may not dominate route costs"
        );
    }

    let nodes = data.nodes();
    let mut i = 0;
    while i < nodes.len() {
        let node = &nodes[i];
        let index = model.node_to_index(i);
        let mut members = vec![index];
        bound_time(model, index, node)?;
        trace!(
            node = i,
            index,
            ready = ?node.time_window().ready(),
            due = ?node.time_window().due(),
            service = node.service_time(),
            "time window"
        );
        restrict_vehicles(model, index, node.allowed_vehicles())?;

        if let Some(j) = partner(nodes, i) {
            let second = &nodes[j];
            let second_index = model.node_to_index(j);
            bound_time(model, second_index, second)?;
            trace!(
                node = j,
                index = second_index,
                ready = ?second.time_window().ready(),
                due = ?second.time_window().due(),
                service = second.service_time(),
                "alternative time window"
            );
            restrict_vehicles(model, second_index, node.allowed_vehicles())?;
            restrict_vehicles(model, second_index, second.allowed_vehicles())?;
            members.push(second_index);
            i += 1;
        }

        let penalty = if node.is_optional() { 0 } else { DISJUNCTION_PENALTY };
        model.add_disjunction(members, Some(penalty));
        i += 1;
    }
    Ok(())
}
