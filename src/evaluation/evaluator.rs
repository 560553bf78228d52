//! Plan evaluator that computes schedules, costs and feasibility.
//!
//! # Algorithm
//!
//! For every vehicle and dimension a forward pass walks the path from the
//! start index to the end index:
//!
//! ```text
//! slack(i)     = max(lower bounds of slack(i), 0) + wait
//! cumul(next)  = cumul(i) + slack(i) + transit(i, next)
//! wait         = max(cumul_min(next) - arrival, 0)
//! ```
//!
//! A pass fails when a slack exceeds the slack maximum or a cumul exceeds
//! its upper bound. Dimensions with a span cost and a free start are
//! evaluated a second time with the start delayed to absorb waiting.
//!
//! Decision variables with an explicit value set are resolved by
//! coordinate descent over the values allowed by their vehicle-only
//! constraints, ranking candidates by violation count, objective and then
//! finalizer.
//!
//! # Complexity
//!
//! O(D × (n + V)) per schedule, where D = dimensions, n = interior indices,
//! V = vehicles. Coordinate descent multiplies this by the total number of
//! candidate values.

use tracing::trace;

use super::Plan;
use crate::engine::{Domain, IntVar, RoutingModel, VarValues};

/// How strictly structural rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every mandatory visit must be performed.
    Complete,
    /// Mandatory visits may still be missing.
    Partial,
}

/// Resolved values of every model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    vehicle: Vec<i64>,
    cumul: Vec<Vec<i64>>,
    slack: Vec<Vec<i64>>,
    decision: Vec<i64>,
}

impl Values {
    fn initial(model: &RoutingModel<'_>, vehicle: Vec<i64>, decision: Vec<i64>) -> Self {
        let n = model.num_indices();
        Self {
            vehicle,
            cumul: model
                .dimensions()
                .iter()
                .map(|d| (0..n).map(|i| d.cumul_min(i)).collect())
                .collect(),
            slack: vec![vec![0; n]; model.dimensions().len()],
            decision,
        }
    }

    pub fn get(&self, var: IntVar) -> Option<i64> {
        match var {
            IntVar::Cumul { dimension, index } => self.cumul.get(dimension)?.get(index).copied(),
            IntVar::Slack { dimension, index } => self.slack.get(dimension)?.get(index).copied(),
            IntVar::Vehicle(index) => self.vehicle.get(index).copied(),
            IntVar::Decision(k) => self.decision.get(k).copied(),
        }
    }
}

impl VarValues for Values {
    fn value(&self, var: IntVar) -> i64 {
        self.get(var).unwrap_or(0)
    }
}

/// Vehicle assignment plus one candidate value for one decision variable.
struct StaticView<'v> {
    vehicle: &'v [i64],
    decision: usize,
    value: i64,
}

impl VarValues for StaticView<'_> {
    fn value(&self, var: IntVar) -> i64 {
        match var {
            IntVar::Vehicle(index) => self.vehicle.get(index).copied().unwrap_or(-1),
            IntVar::Decision(k) if k == self.decision => self.value,
            _ => 0,
        }
    }
}

/// A feasible plan with its schedule.
#[derive(Debug, Clone)]
pub struct Evaluation {
    objective: i64,
    finalizer: i64,
    values: Values,
}

impl Evaluation {
    /// Fixed costs, span costs, soft-bound penalties and disjunction
    /// penalties.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Sum of the quantities minimized by the finalizer.
    pub fn finalizer(&self) -> i64 {
        self.finalizer
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn into_values(self) -> Values {
        self.values
    }
}

struct Scored {
    violations: usize,
    evaluation: Evaluation,
}

impl Scored {
    fn key(&self) -> (usize, i64, i64) {
        (
            self.violations,
            self.evaluation.objective,
            self.evaluation.finalizer,
        )
    }
}

struct Pass {
    cost: i64,
    total_wait: i64,
    delay_room: i64,
}

/// Evaluates plans against a closed [`RoutingModel`].
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::RoutingModel;
/// use u_vrptw::evaluation::{Evaluator, Mode, Plan};
///
/// let coords = [10i64, 20, 0];
/// let mut model = RoutingModel::new(3, 1, &[(2, 2)]);
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
/// let evaluator = Evaluator::new(&model);
/// let plan = Plan::from_routes(vec![vec![0, 1]]);
/// let evaluation = evaluator.evaluate(&plan, Mode::Complete).unwrap();
/// assert_eq!(evaluation.objective(), 40);
/// assert!(evaluator.evaluate(&Plan::new(1), Mode::Complete).is_none());
/// ```
pub struct Evaluator<'m, 'a> {
    model: &'m RoutingModel<'a>,
}

impl<'m, 'a> Evaluator<'m, 'a> {
    pub fn new(model: &'m RoutingModel<'a>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'m RoutingModel<'a> {
        self.model
    }

    /// Schedules `plan` and returns its evaluation, or `None` if the plan
    /// is infeasible.
    pub fn evaluate(&self, plan: &Plan, mode: Mode) -> Option<Evaluation> {
        let vehicle = self.assign_vehicles(plan, mode)?;
        let candidates = self.candidates(&vehicle)?;

        let mut choice: Vec<i64> = self
            .model
            .decisions()
            .iter()
            .zip(&candidates)
            .map(|(decision, values)| match (values, &decision.domain) {
                (Some(values), _) => values.first().copied().unwrap_or(0),
                (None, Domain::Range { min, .. }) => *min,
                (None, Domain::Values(_)) => 0,
            })
            .collect();

        let mut best = self.schedule(plan, &vehicle, &choice);
        let searchable: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, values)| values.as_ref().is_some_and(|v| v.len() > 1))
            .map(|(k, _)| k)
            .collect();

        for _ in 0..2 {
            let mut changed = false;
            for &k in &searchable {
                let Some(values) = &candidates[k] else {
                    continue;
                };
                for &value in values {
                    if value == choice[k] {
                        continue;
                    }
                    let mut trial = choice.clone();
                    trial[k] = value;
                    let scored = self.schedule(plan, &vehicle, &trial);
                    if scored.key() < best.key() {
                        best = scored;
                        choice = trial;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        if best.violations == 0 {
            Some(best.evaluation)
        } else {
            trace!(violations = best.violations, "plan rejected");
            None
        }
    }

    /// Vehicle value of every index, or `None` on a structural violation.
    fn assign_vehicles(&self, plan: &Plan, mode: Mode) -> Option<Vec<i64>> {
        let model = self.model;
        if plan.num_vehicles() != model.num_vehicles() {
            return None;
        }
        let mut vehicle = vec![-1i64; model.num_indices()];
        for v in 0..model.num_vehicles() {
            vehicle[model.start(v)] = v as i64;
            vehicle[model.end(v)] = v as i64;
        }
        for (v, route) in plan.routes().iter().enumerate() {
            for &i in route {
                if i >= model.num_interior() || vehicle[i] != -1 || !model.allows_vehicle(i, v) {
                    return None;
                }
                vehicle[i] = v as i64;
            }
        }
        for group in &model.compiled().groups {
            let active = group.indices().iter().filter(|&&i| vehicle[i] >= 0).count();
            if active > 1 || (active == 0 && group.is_mandatory() && mode == Mode::Complete) {
                return None;
            }
        }
        Some(vehicle)
    }

    /// Allowed values of every value-set decision; `None` if one has none.
    fn candidates(&self, vehicle: &[i64]) -> Option<Vec<Option<Vec<i64>>>> {
        let model = self.model;
        let compiled = model.compiled();
        model
            .decisions()
            .iter()
            .enumerate()
            .map(|(k, decision)| match &decision.domain {
                Domain::Range { .. } => Some(None),
                Domain::Values(values) => {
                    let kept: Vec<i64> = values
                        .iter()
                        .copied()
                        .filter(|&value| {
                            let view = StaticView {
                                vehicle,
                                decision: k,
                                value,
                            };
                            compiled.static_rules[k]
                                .iter()
                                .all(|&id| model.constraints()[id].is_satisfied(&view))
                        })
                        .collect();
                    if kept.is_empty() {
                        trace!(decision = %decision.name, "no allowed value");
                        return None;
                    }
                    Some(Some(kept))
                }
            })
            .collect()
    }

    fn schedule(&self, plan: &Plan, vehicle: &[i64], choice: &[i64]) -> Scored {
        let model = self.model;
        let compiled = model.compiled();
        let mut values = Values::initial(model, vehicle.to_vec(), choice.to_vec());
        let mut violations = 0usize;
        let mut objective = 0i64;

        for v in 0..model.num_vehicles() {
            let path = plan.path(model, v);
            let used = path.len() > 2;
            let mut cost = if used { model.fixed_cost_of_vehicle(v) } else { 0 };
            for d in 0..model.dimensions().len() {
                match self.schedule_dimension(d, v, &path, &mut values) {
                    Some(c) => cost = cost.saturating_add(c),
                    None => violations += 1,
                }
            }
            if used {
                objective = objective.saturating_add(cost);
            }
        }

        for (k, rules) in compiled.range_rules.iter().enumerate() {
            if rules.is_empty() {
                continue;
            }
            if let Domain::Range { min, max } = model.decisions()[k].domain {
                let value = rules.iter().map(|r| r.evaluate(&values)).fold(min, i64::max);
                if value > max {
                    violations += 1;
                }
                values.decision[k] = value;
            }
        }

        violations += compiled
            .checked
            .iter()
            .filter(|&&id| !model.constraints()[id].is_satisfied(&values))
            .count();

        for group in &compiled.groups {
            if let Some(penalty) = group.penalty() {
                if group.indices().iter().all(|&i| vehicle[i] < 0) {
                    objective = objective.saturating_add(penalty);
                }
            }
        }

        let finalizer = model
            .finalizer()
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.evaluate(&values)));

        Scored {
            violations,
            evaluation: Evaluation {
                objective,
                finalizer,
                values,
            },
        }
    }

    /// Schedules one dimension along one path and returns its cost.
    fn schedule_dimension(
        &self,
        d: usize,
        vehicle: usize,
        path: &[usize],
        values: &mut Values,
    ) -> Option<i64> {
        let dim = &self.model.dimensions()[d];
        let start_value = if dim.fix_start_cumul_to_zero() {
            0
        } else {
            dim.cumul_min(path[0])
        };
        let first = self.forward_pass(d, vehicle, path, start_value, values)?;
        if dim.fix_start_cumul_to_zero() || dim.span_cost_coefficient(vehicle) == 0 {
            return Some(first.cost);
        }
        let delay = first.total_wait.min(first.delay_room);
        if delay <= 0 {
            return Some(first.cost);
        }

        let saved_cumul: Vec<i64> = path.iter().map(|&i| values.cumul[d][i]).collect();
        let saved_slack: Vec<i64> = path.iter().map(|&i| values.slack[d][i]).collect();
        match self.forward_pass(d, vehicle, path, start_value.saturating_add(delay), values) {
            Some(delayed) if delayed.cost < first.cost => Some(delayed.cost),
            _ => {
                for (pos, &i) in path.iter().enumerate() {
                    values.cumul[d][i] = saved_cumul[pos];
                    values.slack[d][i] = saved_slack[pos];
                }
                Some(first.cost)
            }
        }
    }

    fn forward_pass(
        &self,
        d: usize,
        vehicle: usize,
        path: &[usize],
        start_value: i64,
        values: &mut Values,
    ) -> Option<Pass> {
        let model = self.model;
        let dim = &model.dimensions()[d];
        let rules = &model.compiled().slack_rules[d];
        let start = path[0];
        if start_value < dim.cumul_min(start) || start_value > dim.cumul_max(start) {
            return None;
        }

        let soft_cost = |index: usize, cumul: i64| dim.soft_upper_bound(index).map_or(0, |b| b.cost(cumul));
        let mut cumul = start_value;
        values.cumul[d][start] = cumul;
        let mut cost = soft_cost(start, cumul);
        let mut total_wait = 0i64;
        let mut delay_room = dim.cumul_max(start).saturating_sub(cumul);

        for pair in path.windows(2) {
            let (i, next) = (pair[0], pair[1]);
            let lower = rules[i]
                .iter()
                .map(|r| r.evaluate(&*values))
                .fold(0, i64::max);
            let transit = dim.transit(vehicle, model.index_to_node(i), model.index_to_node(next));
            let arrival = cumul.saturating_add(lower).saturating_add(transit);
            let wait = dim.cumul_min(next).saturating_sub(arrival).max(0);
            let slack = lower.saturating_add(wait);
            if slack > dim.slack_max() {
                return None;
            }
            values.slack[d][i] = slack;
            cumul = arrival.saturating_add(wait);
            if cumul > dim.cumul_max(next) {
                return None;
            }
            values.cumul[d][next] = cumul;
            total_wait = total_wait.saturating_add(wait);
            delay_room = delay_room.min(
                dim.cumul_max(next)
                    .saturating_sub(cumul)
                    .saturating_add(total_wait),
            );
            cost = cost.saturating_add(soft_cost(next, cumul));
        }
        if let Some(&end) = path.last() {
            values.slack[d][end] = 0;
        }

        let span = cumul.saturating_sub(start_value);
        cost = cost.saturating_add(span.saturating_mul(dim.span_cost_coefficient(vehicle)));
        Some(Pass {
            cost,
            total_wait,
            delay_room,
        })
    }
}
