//! Construction strategy selection.

use super::fleet::FleetStructure;
use crate::engine::{FirstSolutionStrategy, LocalSearchMetaheuristic};

/// Picks the first-solution strategy from the fleet structure.
///
/// | breaks | loop | uniform | strategy |
/// |---|---|---|---|
/// | no | yes | yes | savings |
/// | any | yes or uniform | | parallel cheapest insertion |
/// | any | no | no | automatic |
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::FirstSolutionStrategy;
/// use u_vrptw::formulation::{select_strategy, FleetStructure};
///
/// let fleet = FleetStructure { loop_route: true, uniform: true };
/// assert_eq!(select_strategy(false, fleet), FirstSolutionStrategy::Savings);
/// assert_eq!(
///     select_strategy(true, fleet),
///     FirstSolutionStrategy::ParallelCheapestInsertion
/// );
/// ```
pub fn select_strategy(has_breaks: bool, fleet: FleetStructure) -> FirstSolutionStrategy {
    match (has_breaks, fleet.loop_route, fleet.uniform) {
        (false, true, true) => FirstSolutionStrategy::Savings,
        (_, true, _) | (_, _, true) => FirstSolutionStrategy::ParallelCheapestInsertion,
        _ => FirstSolutionStrategy::Automatic,
    }
}

/// The improvement metaheuristic does not depend on the instance.
pub fn select_metaheuristic() -> LocalSearchMetaheuristic {
    LocalSearchMetaheuristic::GuidedLocalSearch
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fleet(loop_route: bool, uniform: bool) -> FleetStructure {
        FleetStructure { loop_route, uniform }
    }

    #[test]
    fn test_table_rows() {
        assert_eq!(select_strategy(false, fleet(true, true)), FirstSolutionStrategy::Savings);
        assert_eq!(
            select_strategy(false, fleet(true, false)),
            FirstSolutionStrategy::ParallelCheapestInsertion
        );
        assert_eq!(
            select_strategy(false, fleet(false, true)),
            FirstSolutionStrategy::ParallelCheapestInsertion
        );
        assert_eq!(select_strategy(false, fleet(false, false)), FirstSolutionStrategy::Automatic);
        assert_eq!(select_strategy(true, fleet(false, false)), FirstSolutionStrategy::Automatic);
    }

    #[test]
    fn test_guided_local_search_always() {
        assert_eq!(select_metaheuristic(), LocalSearchMetaheuristic::GuidedLocalSearch);
    }

    proptest! {
        #[test]
        fn prop_breaks_rule_out_savings(loop_route: bool, uniform: bool) {
            prop_assert_ne!(select_strategy(true, fleet(loop_route, uniform)), FirstSolutionStrategy::Savings);
        }

        #[test]
        fn prop_automatic_only_without_structure(has_breaks: bool, loop_route: bool, uniform: bool) {
            let strategy = select_strategy(has_breaks, fleet(loop_route, uniform));
            prop_assert_eq!(strategy == FirstSolutionStrategy::Automatic, !loop_route && !uniform);
        }
    }
}
