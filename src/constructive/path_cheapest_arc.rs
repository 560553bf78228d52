//! Path cheapest arc construction.
//!
//! # Algorithm
//!
//! Vehicles are filled one after another. Starting from the vehicle's start
//! anchor, the route is extended with the unserved index reachable by the
//! cheapest arc whose extension keeps the partial plan feasible. An index
//! of a penalized group is only appended while its arc costs less than the
//! penalty. The route is closed when no candidate remains.
//!
//! # Complexity
//!
//! O(V · n² log n) for V vehicles and n interior indices.

use crate::evaluation::{Evaluator, Mode, Plan};

/// Builds a plan by extending each route along its cheapest arc.
pub fn path_cheapest_arc(evaluator: &Evaluator<'_, '_>) -> Plan {
    let model = evaluator.model();
    let compiled = model.compiled();
    let mut plan = Plan::new(model.num_vehicles());
    let mut served = vec![false; compiled.groups.len()];

    for vehicle in 0..model.num_vehicles() {
        loop {
            let current = plan
                .route(vehicle)
                .last()
                .copied()
                .unwrap_or_else(|| model.start(vehicle));

            let mut candidates: Vec<(i64, usize)> = (0..model.num_interior())
                .filter(|&i| !served[compiled.group_of[i]] && model.allows_vehicle(i, vehicle))
                .map(|i| (model.arc_cost(vehicle, current, i), i))
                .filter(|&(cost, i)| {
                    compiled.groups[compiled.group_of[i]]
                        .penalty()
                        .is_none_or(|penalty| cost < penalty)
                })
                .collect();
            candidates.sort_unstable();

            let position = plan.route(vehicle).len();
            let next = candidates.into_iter().map(|(_, i)| i).find(|&i| {
                let trial = plan.with_inserted(vehicle, position, i);
                evaluator.evaluate(&trial, Mode::Partial).is_some()
            });
            match next {
                Some(i) => {
                    plan.route_mut(vehicle).push(i);
                    served[compiled.group_of[i]] = true;
                }
                None => break,
            }
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoutingModel;

    // stops at 30, 10 and 20, depot at 0
    const COORDS: [i64; 4] = [30, 10, 20, 0];

    fn model(capacity: i64) -> RoutingModel<'static> {
        let mut m = RoutingModel::new(4, 2, &[(3, 3), (3, 3)]);
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
        m.add_dimension(Box::new(|a: usize, _: usize| i64::from(a < 3)), 0, capacity, true, "load");
        m
    }

    #[test]
    fn test_follows_nearest_stop() {
        let mut m = model(10);
        m.close();
        let plan = path_cheapest_arc(&Evaluator::new(&m));
        assert_eq!(plan.route(0), &[1, 2, 0]);
        assert!(plan.route(1).is_empty());
    }

    #[test]
    fn test_capacity_opens_second_route() {
        let mut m = model(2);
        m.close();
        let plan = path_cheapest_arc(&Evaluator::new(&m));
        assert_eq!(plan.route(0), &[1, 2]);
        assert_eq!(plan.route(1), &[0]);
    }

    #[test]
    fn test_expensive_optional_stop_skipped() {
        let mut m = model(10);
        m.add_disjunction(vec![0], Some(5));
        m.close();
        let plan = path_cheapest_arc(&Evaluator::new(&m));
        assert_eq!(plan.route(0), &[1, 2]);
        assert!(plan.route(1).is_empty());
    }
}
