//! Constructive heuristics for building first solutions.
//!
//! - [`savings`] — Clarke-Wright savings over visit chains (1964), O(n² log n)
//! - [`parallel_cheapest_insertion`] — Cheapest feasible insertion across all routes, O(n²V)
//! - [`path_cheapest_arc`] — Route-by-route cheapest arc extension, O(Vn² log n)
//!
//! Every strategy ends with [`complete_by_insertion`], so visits a chain
//! heuristic could not place are still inserted where feasible.

mod parallel_insertion;
mod path_cheapest_arc;
mod savings;

pub use parallel_insertion::{complete_by_insertion, parallel_cheapest_insertion};
pub use path_cheapest_arc::path_cheapest_arc;
pub use savings::savings;

use tracing::debug;

use crate::engine::FirstSolutionStrategy;
use crate::evaluation::{Evaluator, Mode, Plan};

/// Builds a first plan with `strategy`.
///
/// [`FirstSolutionStrategy::Automatic`] uses path cheapest arc. Returns
/// `None` when the completed plan still leaves a mandatory visit unserved
/// or breaks a constraint.
pub fn build_first_solution(evaluator: &Evaluator<'_, '_>, strategy: FirstSolutionStrategy) -> Option<Plan> {
    let plan = match strategy {
        FirstSolutionStrategy::Automatic => path_cheapest_arc(evaluator),
        FirstSolutionStrategy::Savings => savings(evaluator),
        FirstSolutionStrategy::ParallelCheapestInsertion => parallel_cheapest_insertion(evaluator),
    };
    let plan = complete_by_insertion(evaluator, plan);

    if evaluator.evaluate(&plan, Mode::Complete).is_none() {
        debug!(?strategy, performed = plan.num_performed(), "no feasible first solution");
        return None;
    }
    debug!(?strategy, performed = plan.num_performed(), "first solution built");
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoutingModel;

    const COORDS: [i64; 4] = [5, 15, 25, 0];

    fn model() -> RoutingModel<'static> {
        let mut m = RoutingModel::new(4, 1, &[(3, 3)]);
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
        m
    }

    #[test]
    fn test_every_strategy_serves_all_stops() {
        for strategy in [
            FirstSolutionStrategy::Automatic,
            FirstSolutionStrategy::Savings,
            FirstSolutionStrategy::ParallelCheapestInsertion,
        ] {
            let mut m = model();
            m.close();
            let plan = build_first_solution(&Evaluator::new(&m), strategy).expect("feasible");
            assert_eq!(plan.num_performed(), 3, "{strategy:?}");
        }
    }

    #[test]
    fn test_infeasible_mandatory_visit() {
        let mut m = model();
        if let Ok(d) = m.dimension_mut("distance") {
            d.set_cumul_max(2, 10);
        }
        m.close();
        let evaluator = Evaluator::new(&m);
        assert!(build_first_solution(&evaluator, FirstSolutionStrategy::Automatic).is_none());
    }
}
