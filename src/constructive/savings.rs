//! Clarke-Wright savings construction.
//!
//! # Algorithm
//!
//! Every interior index starts on its own chain. Joining the tail `i` of
//! one chain to the head `j` of another saves
//!
//! ```text
//! s(i, j) = c(i, end) + c(start, j) - c(i, j)
//! ```
//!
//! measured on the arc costs of the first vehicle. Chains are joined in
//! decreasing order of savings when the joined chain holds at most one
//! index per visit group and is feasible on its own for some vehicle.
//! Chains are then handed to vehicles, longest first; what cannot be placed
//! is left to insertion.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of interior indices (dominated by sorting
//! savings), plus one feasibility check per accepted join.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use std::cmp::Reverse;

use crate::evaluation::{Evaluator, Mode, Plan};

/// A saving for linking the chain ending in `i` to the chain starting in `j`.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: i64,
}

/// Builds a partial plan from savings-merged chains.
///
/// Indices that end up on no route are expected to be inserted afterwards.
pub fn savings(evaluator: &Evaluator<'_, '_>) -> Plan {
    let model = evaluator.model();
    let num_vehicles = model.num_vehicles();
    let n = model.num_interior();
    if num_vehicles == 0 || n == 0 {
        return Plan::new(num_vehicles);
    }

    let (start, end) = (model.start(0), model.end(0));
    let cost = |a: usize, b: usize| model.arc_cost(0, a, b);

    let mut savings_list: Vec<Saving> = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let value = cost(i, end)
                .saturating_add(cost(start, j))
                .saturating_sub(cost(i, j));
            if value > 0 {
                savings_list.push(Saving { i, j, value });
            }
        }
    }
    // stable: equal savings keep index order
    savings_list.sort_by_key(|s| Reverse(s.value));

    let group_of = &model.compiled().group_of;
    let mut chain_of: Vec<usize> = (0..n).collect();
    let mut chains: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    for saving in &savings_list {
        let (ci, cj) = (chain_of[saving.i], chain_of[saving.j]);
        if ci == cj
            || chains[ci].last() != Some(&saving.i)
            || chains[cj].first() != Some(&saving.j)
        {
            continue;
        }
        let shares_group = chains[ci]
            .iter()
            .any(|&a| chains[cj].iter().any(|&b| group_of[a] == group_of[b]));
        if shares_group {
            continue;
        }

        let merged: Vec<usize> = chains[ci].iter().chain(&chains[cj]).copied().collect();
        if !feasible_alone(evaluator, &merged) {
            continue;
        }
        for &k in &merged {
            chain_of[k] = ci;
        }
        chains[ci] = merged;
        chains[cj].clear();
    }

    let mut order: Vec<usize> = (0..n).filter(|&c| chains[c].len() > 1).collect();
    order.sort_by_key(|&c| Reverse(chains[c].len()));

    let mut plan = Plan::new(num_vehicles);
    for c in order {
        for vehicle in 0..num_vehicles {
            if !plan.route(vehicle).is_empty() {
                continue;
            }
            let mut trial = plan.clone();
            trial.route_mut(vehicle).clone_from(&chains[c]);
            if evaluator.evaluate(&trial, Mode::Partial).is_some() {
                plan = trial;
                break;
            }
        }
    }
    plan
}

/// Whether `chain` is feasible as the only route of some allowed vehicle.
fn feasible_alone(evaluator: &Evaluator<'_, '_>, chain: &[usize]) -> bool {
    let model = evaluator.model();
    (0..model.num_vehicles()).any(|vehicle| {
        if !chain.iter().all(|&i| model.allows_vehicle(i, vehicle)) {
            return false;
        }
        let mut plan = Plan::new(model.num_vehicles());
        plan.route_mut(vehicle).extend_from_slice(chain);
        evaluator.evaluate(&plan, Mode::Partial).is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoutingModel;

    // two clusters either side of the depot at 0
    const COORDS: [i64; 5] = [-20, -10, 10, 20, 0];

    fn model(load_capacity: i64) -> RoutingModel<'static> {
        let mut m = RoutingModel::new(5, 2, &[(4, 4), (4, 4)]);
        m.add_dimension(
            Box::new(|a: usize, b: usize| (COORDS[a] - COORDS[b]).abs()),
            0,
            1_000,
            true,
            "distance",
        );
        if let Ok(d) = m.dimension_mut("distance") {
            d.set_span_cost_coefficient_for_all_vehicles(1);
        }
        m.add_dimension(Box::new(|a: usize, _: usize| i64::from(a < 4)), 0, load_capacity, true, "load");
        m
    }

    #[test]
    fn test_merges_clusters_into_chains() {
        let mut m = model(10);
        m.close();
        let plan = savings(&Evaluator::new(&m));
        let mut lens: Vec<usize> = plan.routes().iter().map(Vec::len).collect();
        lens.sort_unstable();
        assert_eq!(lens, vec![2, 2]);
        for route in plan.routes() {
            let same_side = route.iter().all(|&i| COORDS[i] < 0) || route.iter().all(|&i| COORDS[i] > 0);
            assert!(same_side);
        }
    }

    #[test]
    fn test_group_members_not_chained() {
        let mut m = model(10);
        m.add_disjunction(vec![2, 3], Some(1_000));
        m.close();
        let plan = savings(&Evaluator::new(&m));
        for route in plan.routes() {
            assert!(!(route.contains(&2) && route.contains(&3)));
        }
    }

    #[test]
    fn test_capacity_limits_chains() {
        let mut m = model(1);
        m.close();
        let plan = savings(&Evaluator::new(&m));
        assert_eq!(plan.num_performed(), 0);
    }
}
