//! Parallel cheapest insertion.
//!
//! # Algorithm
//!
//! All routes are grown at once. For every unserved visit group, member and
//! vehicle, insertion positions are tried in increasing order of the
//! estimated arc delta
//!
//! ```text
//! c(prev, u) + c(u, next) - c(prev, next)
//! ```
//!
//! and the first feasible one is kept. The cheapest insertion over all
//! candidates is applied; a penalized group is only inserted while its
//! insertion costs less than the penalty it saves. Cached candidates of
//! the vehicle that received the insertion are recomputed.
//!
//! # Complexity
//!
//! O(n² · V) candidate evaluations in the worst case, where n = interior
//! indices and V = vehicles.

use std::collections::HashMap;

use crate::evaluation::{Evaluator, Mode, Plan};

/// A feasible insertion and its ranking key.
#[derive(Debug, Clone, Copy)]
struct Insertion {
    index: usize,
    vehicle: usize,
    position: usize,
    /// Mandatory groups rank before penalized ones.
    key: (u8, i64),
}

/// Builds a plan from scratch by parallel cheapest insertion.
///
/// # Examples
///
/// ```
/// use u_vrptw::constructive::parallel_cheapest_insertion;
/// use u_vrptw::engine::RoutingModel;
/// use u_vrptw::evaluation::Evaluator;
///
/// let coords = [10i64, 20, 30, 0];
/// let mut model = RoutingModel::new(4, 1, &[(3, 3)]);
/// model.add_dimension(
///     Box::new(move |a: usize, b: usize| (coords[a] - coords[b]).abs()),
///     0,
///     1_000,
///     true,
///     "distance",
/// );
/// model.dimension_mut("distance").unwrap().set_span_cost_coefficient_for_all_vehicles(1);
/// model.close();
///
/// let plan = parallel_cheapest_insertion(&Evaluator::new(&model));
/// assert_eq!(plan.num_performed(), 3);
/// ```
pub fn parallel_cheapest_insertion(evaluator: &Evaluator<'_, '_>) -> Plan {
    let num_vehicles = evaluator.model().num_vehicles();
    complete_by_insertion(evaluator, Plan::new(num_vehicles))
}

/// Inserts unserved visit groups into `plan` until no insertion pays off.
pub fn complete_by_insertion(evaluator: &Evaluator<'_, '_>, mut plan: Plan) -> Plan {
    let model = evaluator.model();
    let compiled = model.compiled();
    let performed = plan.performed(model.num_indices());
    let mut served: Vec<bool> = compiled
        .groups
        .iter()
        .map(|g| g.indices().iter().any(|&i| performed[i]))
        .collect();
    let mut cache: HashMap<(usize, usize), Option<Insertion>> = HashMap::new();

    loop {
        let mut best: Option<Insertion> = None;
        for (g, group) in compiled.groups.iter().enumerate() {
            if served[g] {
                continue;
            }
            for &index in group.indices() {
                for vehicle in 0..model.num_vehicles() {
                    if !model.allows_vehicle(index, vehicle) {
                        continue;
                    }
                    let candidate = cache.entry((index, vehicle)).or_insert_with(|| {
                        best_position(evaluator, &plan, index, vehicle, group.penalty())
                    });
                    if let Some(insertion) = candidate {
                        if best.is_none_or(|b| insertion.key < b.key) {
                            best = Some(*insertion);
                        }
                    }
                }
            }
        }

        let Some(insertion) = best else {
            break;
        };
        plan.route_mut(insertion.vehicle)
            .insert(insertion.position, insertion.index);
        served[compiled.group_of[insertion.index]] = true;
        cache.retain(|&(_, vehicle), _| vehicle != insertion.vehicle);
    }
    plan
}

/// First feasible position of `index` in the route of `vehicle`, trying
/// positions by increasing estimated cost.
fn best_position(
    evaluator: &Evaluator<'_, '_>,
    plan: &Plan,
    index: usize,
    vehicle: usize,
    penalty: Option<i64>,
) -> Option<Insertion> {
    let model = evaluator.model();
    let path = plan.path(model, vehicle);
    let fixed = if plan.route(vehicle).is_empty() {
        model.fixed_cost_of_vehicle(vehicle)
    } else {
        0
    };

    let mut positions: Vec<(i64, usize)> = path
        .windows(2)
        .enumerate()
        .map(|(position, w)| {
            let delta = model
                .arc_cost(vehicle, w[0], index)
                .saturating_add(model.arc_cost(vehicle, index, w[1]))
                .saturating_sub(model.arc_cost(vehicle, w[0], w[1]));
            (delta, position)
        })
        .collect();
    positions.sort_unstable();

    for (delta, position) in positions {
        let cost = delta.saturating_add(fixed);
        let key = match penalty {
            None => (0, cost),
            Some(penalty) => {
                let saving = cost.saturating_sub(penalty);
                if saving >= 0 {
                    // later positions only cost more
                    return None;
                }
                (1, saving)
            }
        };
        let trial = plan.with_inserted(vehicle, position, index);
        if evaluator.evaluate(&trial, Mode::Partial).is_some() {
            return Some(Insertion {
                index,
                vehicle,
                position,
                key,
            });
        }
    }
    None
}
