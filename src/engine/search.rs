//! Search driver: first solution, local search, guided local search.

use std::time::Instant;

use tracing::{debug, instrument};

use super::guided_local_search::GuidedLocalSearch;
use super::monitor::SearchMonitor;
use super::params::{LocalSearchMetaheuristic, SearchParameters};
use super::{Assignment, RoutingModel};
use crate::constructive::build_first_solution;
use crate::evaluation::{Evaluation, Evaluator, Mode, Plan};
use crate::local_search::neighborhood;

/// Outcome of one local search step.
enum Step {
    Improved(Plan, Evaluation),
    LocalOptimum,
    Interrupted,
}

struct Search<'m, 'a, 's> {
    evaluator: Evaluator<'m, 'a>,
    deadline: Option<Instant>,
    monitors: &'s mut [Box<dyn SearchMonitor + 'a>],
}

impl<'m, 'a> Search<'m, 'a, '_> {
    fn model(&self) -> &'m RoutingModel<'a> {
        self.evaluator.model()
    }

    fn interrupted(&mut self) -> bool {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return true;
        }
        // every monitor is polled
        self.monitors
            .iter_mut()
            .fold(false, |stop, monitor| !monitor.check() || stop)
    }

    /// Reports a solution; returns `false` if a monitor asks to stop.
    fn report(&mut self, objective: i64) -> bool {
        self.monitors
            .iter_mut()
            .fold(true, |keep, monitor| monitor.at_solution(objective) && keep)
    }

    /// Looks for the first neighbor improving the augmented objective.
    fn step(&mut self, plan: &Plan, evaluation: &Evaluation, gls: &GuidedLocalSearch) -> Step {
        let model = self.model();
        let current = evaluation
            .objective()
            .saturating_add(gls.penalty_cost(model, plan));
        for mv in neighborhood(model, plan) {
            if self.interrupted() {
                return Step::Interrupted;
            }
            let Some(candidate) = mv.apply(plan) else {
                continue;
            };
            let Some(candidate_eval) = self.evaluator.evaluate(&candidate, Mode::Complete) else {
                continue;
            };
            let augmented = candidate_eval
                .objective()
                .saturating_add(gls.penalty_cost(model, &candidate));
            if augmented < current {
                return Step::Improved(candidate, candidate_eval);
            }
        }
        Step::LocalOptimum
    }
}

/// Runs the search on a closed model.
#[instrument(skip_all, level = "debug")]
pub(crate) fn run<'a>(
    model: &RoutingModel<'a>,
    params: &SearchParameters,
    monitors: &mut [Box<dyn SearchMonitor + 'a>],
) -> Option<Assignment> {
    let started = Instant::now();
    let evaluator = Evaluator::new(model);
    let plan = build_first_solution(&evaluator, params.first_solution_strategy)?;
    let evaluation = evaluator.evaluate(&plan, Mode::Complete)?;
    debug!(
        strategy = ?params.first_solution_strategy,
        objective = evaluation.objective(),
        "first solution"
    );

    let mut search = Search {
        evaluator,
        deadline: params.time_limit.map(|limit| started + limit),
        monitors,
    };
    let mut gls = GuidedLocalSearch::new(
        model.num_indices(),
        params.guided_local_search_lambda_coefficient,
    );

    let mut best = (plan.clone(), evaluation.clone());
    let mut current = (plan, evaluation);
    let mut solutions = 1u64;
    let mut stale_optima = 0u64;
    let under_limit = |solutions: u64| params.solution_limit.is_none_or(|limit| solutions < limit);
    let mut keep_going = search.report(current.1.objective()) && under_limit(solutions);

    while keep_going {
        match search.step(&current.0, &current.1, &gls) {
            Step::Improved(plan, evaluation) => {
                solutions += 1;
                if evaluation.objective() < best.1.objective() {
                    best = (plan.clone(), evaluation.clone());
                    stale_optima = 0;
                }
                let objective = evaluation.objective();
                current = (plan, evaluation);
                keep_going = search.report(objective) && under_limit(solutions);
            }
            Step::LocalOptimum => {
                if params.local_search_metaheuristic == LocalSearchMetaheuristic::GreedyDescent {
                    break;
                }
                debug!(objective = current.1.objective(), stale_optima, "local optimum");
                if stale_optima >= params.max_stale_local_optima {
                    break;
                }
                stale_optima += 1;
                if !gls.penalize(model, &current.0) {
                    break;
                }
                keep_going = search.report(current.1.objective());
            }
            Step::Interrupted => break,
        }
    }

    debug!(
        solutions,
        objective = best.1.objective(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search finished"
    );
    Some(Assignment::new(model, &best.0, best.1))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::{FirstSolutionStrategy, NoImprovementLimit, SolutionLimit};
    use super::*;

    // stops on a line, depot at 0
    const COORDS: [i64; 5] = [30, 10, 40, 20, 0];

    fn model() -> RoutingModel<'static> {
        let mut m = RoutingModel::new(5, 1, &[(4, 4)]);
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
    fn test_finds_line_optimum() {
        let mut m = model();
        m.add_search_monitor(Box::new(NoImprovementLimit::new(20, Duration::from_secs(60), 2)));
        let params = SearchParameters::default().with_time_limit(Duration::from_secs(5));
        let assignment = m.solve_with_parameters(&params).expect("feasible");
        assert_eq!(assignment.objective_value(), 80);
    }

    #[test]
    fn test_solution_limit_returns_first_solution() {
        for strategy in [
            FirstSolutionStrategy::Automatic,
            FirstSolutionStrategy::Savings,
            FirstSolutionStrategy::ParallelCheapestInsertion,
        ] {
            let mut m = model();
            m.add_search_monitor(Box::new(SolutionLimit::new(1)));
            let params = SearchParameters::default().with_first_solution_strategy(strategy);
            let assignment = m.solve_with_parameters(&params).expect("feasible");
            assert_eq!(assignment.route(0).len(), 6);
            assert!(assignment.objective_value() >= 80);
        }
    }

    #[test]
    fn test_greedy_descent_stops_at_local_optimum() {
        let m = model();
        let params = SearchParameters::default().with_metaheuristic(LocalSearchMetaheuristic::GreedyDescent);
        let assignment = m.solve_with_parameters(&params).expect("feasible");
        assert_eq!(assignment.objective_value(), 80);
    }

    #[test]
    fn test_default_parameters_terminate() {
        let m = model();
        let assignment = m
            .solve_with_parameters(&SearchParameters::default())
            .expect("feasible");
        assert_eq!(assignment.objective_value(), 80);
    }

    #[test]
    fn test_solution_limit_parameter() {
        let m = model();
        let params = SearchParameters::default()
            .with_first_solution_strategy(FirstSolutionStrategy::Savings)
            .with_solution_limit(1);
        let assignment = m.solve_with_parameters(&params).expect("feasible");
        assert_eq!(assignment.route(0).len(), 6);
    }

    #[test]
    fn test_no_stale_optima_allowed_stops_at_first_optimum() {
        let m = model();
        let params = SearchParameters::default().with_max_stale_local_optima(0);
        let assignment = m.solve_with_parameters(&params).expect("feasible");
        assert_eq!(assignment.objective_value(), 80);
    }

    #[test]
    fn test_window_monitor_ends_guided_search() {
        let mut m = model();
        m.add_search_monitor(Box::new(NoImprovementLimit::new(0, Duration::from_millis(5), 2)));
        let params = SearchParameters::default().with_max_stale_local_optima(u64::MAX);
        let assignment = m.solve_with_parameters(&params).expect("feasible");
        assert_eq!(assignment.objective_value(), 80);
    }

    #[test]
    fn test_infeasible_model_has_no_assignment() {
        let mut m = model();
        if let Ok(d) = m.dimension_mut("distance") {
            d.set_end_cumul_max(0, 50);
        }
        m.add_search_monitor(Box::new(SolutionLimit::new(1)));
        assert!(m.solve_with_parameters(&SearchParameters::default()).is_none());
    }
}
