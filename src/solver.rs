//! Solve orchestration: formulate, search once, decode.

use tracing::{info, instrument};

use crate::config::SolverConfig;
use crate::engine::{Assignment, IntVar, NoImprovementLimit, SolutionLimit};
use crate::error::Result;
use crate::formulation::{formulate, Formulation};
use crate::models::{PlannedRoute, ProblemData, RouteStep, Solution, SolveOutcome};

/// Where each model index sits, kept once the model is consumed.
struct Layout {
    index_to_node: Vec<usize>,
    num_interior: usize,
}

/// Solves `data` under `config`.
///
/// # Errors
///
/// Fails when the configuration has no stop condition or the instance
/// refers to an unknown vehicle. An instance without a feasible plan is
/// [`SolveOutcome::NoSolution`].
///
/// # Examples
///
/// ```
/// use u_vrptw::config::SolverConfig;
/// use u_vrptw::distance::{TravelMatrices, TravelMatrix};
/// use u_vrptw::models::{Node, ProblemData, Vehicle};
/// use u_vrptw::solver::solve;
///
/// let matrix = TravelMatrix::from_rows(vec![vec![0, 4, 6], vec![4, 0, 3], vec![6, 3, 0]]).unwrap();
/// let data = ProblemData::new(
///     vec![Node::new("a", 1), Node::new("b", 2)],
///     vec![Vehicle::new("van", 0, 0).with_costs(0, 1, 0)],
///     Vec::new(),
///     vec![TravelMatrices::uniform(matrix)],
///     1_000,
/// );
/// let config = SolverConfig { no_improvement_limit: Some(10), ..SolverConfig::default() };
///
/// let outcome = solve(&data, &config).unwrap();
/// let solution = outcome.solution().unwrap();
/// assert_eq!(solution.objective(), 13);
/// assert_eq!(solution.num_served(), 2);
/// ```
#[instrument(skip_all, level = "debug", fields(stops = data.num_stops(), vehicles = data.vehicles().len()))]
pub fn solve(data: &ProblemData, config: &SolverConfig) -> Result<SolveOutcome> {
    config.validate()?;

    let Formulation {
        mut model,
        breaks,
        parameters,
        ..
    } = formulate(data, config.nearby)?;

    let mut parameters = parameters.with_lambda_coefficient(config.guided_local_search_lambda);
    if let Some(limit) = config.time_limit() {
        parameters = parameters.with_time_limit(limit);
    }
    if let Some(limit) = config.solution_limit {
        parameters = parameters.with_solution_limit(limit);
    }
    if data.num_stops() <= 1 {
        model.add_search_monitor(Box::new(SolutionLimit::new(1)));
    } else if let Some(tolerance) = config.no_improvement_limit {
        model.add_search_monitor(Box::new(NoImprovementLimit::new(
            tolerance,
            config.initial_no_improvement_timeout(),
            config.timeout_multiplier,
        )));
    }

    let layout = Layout {
        index_to_node: (0..model.num_indices()).map(|i| model.index_to_node(i)).collect(),
        num_interior: model.num_interior(),
    };
    let Some(assignment) = model.solve_with_parameters(&parameters) else {
        info!("no solution found");
        return Ok(SolveOutcome::NoSolution);
    };

    let solution = decode(data, &layout, &assignment, &breaks);
    info!(
        objective = solution.objective(),
        served = solution.num_served(),
        unperformed = solution.unperformed().len(),
        "solved"
    );
    Ok(SolveOutcome::Solved(solution))
}

/// Turns index paths and break positions into located route steps.
fn decode(data: &ProblemData, layout: &Layout, assignment: &Assignment, breaks: &[IntVar]) -> Solution {
    let positions: Vec<Option<i64>> = breaks.iter().map(|&var| assignment.value(var)).collect();

    let mut routes = Vec::with_capacity(assignment.num_vehicles());
    let mut visited = Vec::with_capacity(assignment.num_vehicles());
    let mut served = vec![false; data.num_stops()];

    for (v, vehicle) in data.vehicles().iter().enumerate() {
        let path = assignment.route(v);
        let mut steps = vec![RouteStep::Stop(vehicle.start_location())];
        let mut stops = Vec::new();
        for &index in path {
            if index < layout.num_interior {
                let node = layout.index_to_node[index];
                steps.push(RouteStep::Stop(data.nodes()[node].matrix_index()));
                stops.push(node);
                served[node] = true;
            }
            steps.extend(breaks_at(data, &positions, v, index));
        }
        steps.push(RouteStep::Stop(vehicle.end_location()));
        routes.push(PlannedRoute::new(v, steps));
        visited.push(stops);
    }

    let unperformed = served
        .iter()
        .enumerate()
        .filter_map(|(node, &done)| (!done).then_some(node))
        .collect();
    Solution::new(assignment.objective_value(), routes, visited, unperformed)
}

/// Breaks of `vehicle` positioned at `index`.
fn breaks_at<'d>(
    data: &'d ProblemData,
    positions: &'d [Option<i64>],
    vehicle: usize,
    index: usize,
) -> impl Iterator<Item = RouteStep> + 'd {
    data.breaks()
        .iter()
        .zip(positions)
        .enumerate()
        .filter(move |(_, (rest, position))| rest.vehicle() == vehicle && **position == Some(index as i64))
        .map(|(b, _)| RouteStep::Break(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::error::RoutingError;
    use crate::models::{Break, Node, TimeWindow, Vehicle};

    /// Locations on a line at 0, 10, 20 and 30; travel time = distance.
    fn line() -> TravelMatrices {
        let coords = [0i64, 10, 20, 30];
        let rows = coords
            .iter()
            .map(|a| coords.iter().map(|b| (a - b).abs()).collect())
            .collect();
        TravelMatrices::uniform(TravelMatrix::from_rows(rows).expect("square"))
    }

    fn config() -> SolverConfig {
        SolverConfig {
            time_limit_ms: 2_000,
            no_improvement_limit: Some(30),
            ..SolverConfig::default()
        }
    }

    fn solved(data: &ProblemData) -> Solution {
        match solve(data, &config()).expect("valid config") {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::NoSolution => panic!("expected a solution"),
        }
    }

    #[test]
    fn test_tight_windows_force_due_order() {
        let data = ProblemData::new(
            vec![
                Node::new("a", 1).with_time_window(TimeWindow::closed(50, 55)),
                Node::new("b", 2).with_time_window(TimeWindow::closed(40, 45)),
                Node::new("c", 3).with_time_window(TimeWindow::closed(30, 35)),
            ],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let solution = solved(&data);
        assert_eq!(solution.routes()[0].locations(), vec![0, 3, 2, 1, 0]);
        // 30 + 10 + 10 + 10
        assert_eq!(solution.objective(), 60);
        assert!(solution.unperformed().is_empty());
    }

    #[test]
    fn test_objective_matches_decoded_routes() {
        let matrices = line();
        let data = ProblemData::new(
            vec![
                Node::new("a", 1),
                Node::new("b", 3),
                Node::new("c", 2),
                Node::new("d", 1),
            ],
            vec![
                Vehicle::new("v0", 0, 0).with_costs(0, 1, 1),
                Vehicle::new("v1", 0, 0).with_costs(0, 1, 1),
            ],
            Vec::new(),
            vec![matrices.clone()],
            1_000,
        );
        let solution = solved(&data);
        assert_eq!(solution.num_served(), 4);

        let recomputed: i64 = solution
            .routes()
            .iter()
            .filter(|route| !route.is_empty())
            .map(|route| {
                route
                    .locations()
                    .windows(2)
                    .map(|w| matrices.time(w[0], w[1]) + matrices.distance(w[0], w[1]))
                    .sum::<i64>()
            })
            .sum();
        assert_eq!(solution.objective(), recomputed);
        assert_eq!(solution.objective(), 120);
    }

    #[test]
    fn test_nearby_adds_order_span_to_objective() {
        use crate::formulation::dimensions::order_transit;

        let matrices = line();
        let data = ProblemData::new(
            vec![Node::new("a", 1), Node::new("b", 2)],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 5, 5)],
            Vec::new(),
            vec![matrices.clone()],
            10_000,
        );
        let config = SolverConfig {
            nearby: true,
            ..config()
        };
        let solution = match solve(&data, &config).expect("valid config") {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::NoSolution => panic!("expected a solution"),
        };
        assert_eq!(solution.num_served(), 2);

        // order coefficient is (5 + 5) / 5
        let recomputed: i64 = solution.routes()[0]
            .locations()
            .windows(2)
            .map(|w| {
                let time = matrices.time(w[0], w[1]);
                5 * time + 5 * matrices.distance(w[0], w[1]) + 2 * order_transit(time)
            })
            .sum();
        assert_eq!(solution.objective(), recomputed);
        // 5 * 40 + 5 * 40 + 2 * (316 + 316 + 447)
        assert_eq!(solution.objective(), 2_558);
    }

    #[test]
    fn test_paired_alternatives_visited_once() {
        let data = ProblemData::new(
            vec![
                Node::new("a-morning", 2).with_time_window(TimeWindow::closed(0, 30)),
                Node::new("a-evening", 2).with_time_window(TimeWindow::closed(500, 600)),
                Node::new("b", 1).with_time_window(TimeWindow::closed(0, 15)),
            ],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let solution = solved(&data);
        let stops = solution.visited_stops(0);
        assert_eq!(stops.iter().filter(|&&s| s < 2).count(), 1);
        assert!(stops.contains(&2));
        assert_eq!(solution.unperformed().len(), 1);
        // b closes before the evening window opens
        assert!(stops.contains(&0));
    }

    #[test]
    fn test_break_is_decoded_on_its_vehicle() {
        let data = ProblemData::new(
            vec![Node::new("a", 1), Node::new("b", 3)],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            vec![Break::new(0, 15, TimeWindow::closed(5, 100))],
            vec![line()],
            1_000,
        );
        let solution = solved(&data);
        let route = &solution.routes()[0];
        assert_eq!(route.breaks(), vec![0]);
        assert_eq!(route.len(), 2);
        // taken after returning, the break does not lengthen the route
        assert_eq!(&route.steps()[route.steps().len() - 2..], &[RouteStep::Break(0), RouteStep::Stop(0)]);
        assert_eq!(solution.objective(), 60);
    }

    #[test]
    fn test_unreachable_break_has_no_solution() {
        let data = ProblemData::new(
            vec![Node::new("a", 1), Node::new("b", 2)],
            vec![Vehicle::new("v", 0, 0).with_time_window(TimeWindow::closed(10, 500))],
            vec![Break::new(0, 15, TimeWindow::closed(0, 5))],
            vec![line()],
            1_000,
        );
        assert_eq!(solve(&data, &config()), Ok(SolveOutcome::NoSolution));
    }

    #[test]
    fn test_unreachable_stop_is_dropped() {
        let data = ProblemData::new(
            vec![
                Node::new("a", 1),
                Node::new("b", 3).with_time_window(TimeWindow::closed(0, 5)),
            ],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let solution = solved(&data);
        assert_eq!(solution.unperformed(), &[1]);
        assert_eq!(solution.objective(), 20 + crate::formulation::DISJUNCTION_PENALTY);
    }

    #[test]
    fn test_single_stop_stops_at_first_solution() {
        let data = ProblemData::new(
            vec![Node::new("a", 2)],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let config = SolverConfig {
            no_improvement_limit: Some(1),
            ..SolverConfig::default()
        };
        let outcome = solve(&data, &config).expect("valid");
        assert_eq!(outcome.solution().map(Solution::objective), Some(40));
    }

    #[test]
    fn test_solution_limit_alone_bounds_the_search() {
        let data = ProblemData::new(
            vec![Node::new("a", 1), Node::new("b", 3), Node::new("c", 2)],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let config = SolverConfig {
            solution_limit: Some(1),
            ..SolverConfig::default()
        };
        let outcome = solve(&data, &config).expect("valid");
        let solution = outcome.solution().expect("first solution");
        assert_eq!(solution.num_served(), 3);
        assert!(solution.objective() >= 60);
    }

    #[test]
    fn test_missing_stop_condition_is_refused() {
        let data = ProblemData::new(Vec::new(), Vec::new(), Vec::new(), vec![line()], 1_000);
        assert_eq!(
            solve(&data, &SolverConfig::default()),
            Err(RoutingError::NoStopCondition)
        );
    }

    #[test]
    fn test_late_stop_pays_its_multiplier() {
        let data = ProblemData::new(
            vec![Node::new("a", 3)
                .with_time_window(TimeWindow::closed(0, 20))
                .with_late_multiplier(2)],
            vec![Vehicle::new("v", 0, 0).with_costs(0, 1, 0)],
            Vec::new(),
            vec![line()],
            1_000,
        );
        let solution = solved(&data);
        assert!(solution.unperformed().is_empty());
        // 60 of travel plus 10 late at 2 per unit
        assert_eq!(solution.objective(), 80);
    }
}
