//! The routing model.
//!
//! # Index layout
//!
//! Every model node that is not a vehicle anchor becomes an interior index
//! `0..k`. Vehicle `v` then owns start index `k + v` and end index
//! `k + V + v`, where `V` is the fleet size. Routes are sequences of
//! interior indices between a start and an end index.

use tracing::debug;

use super::dimension::{Dimension, Transit};
use super::expr::{Constraint, DimensionId, Expr, IntVar};
use super::monitor::SearchMonitor;
use super::params::SearchParameters;
use super::{search, Assignment};
use crate::error::{Result, RoutingError};

/// A set of alternative indices of which at most one is visited.
///
/// `penalty: None` makes the set mandatory; otherwise leaving every member
/// unvisited costs the penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    indices: Vec<usize>,
    penalty: Option<i64>,
}

impl Disjunction {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn penalty(&self) -> Option<i64> {
        self.penalty
    }

    pub fn is_mandatory(&self) -> bool {
        self.penalty.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Domain {
    Range { min: i64, max: i64 },
    Values(Vec<i64>),
}

#[derive(Debug, Clone)]
pub(crate) struct DecisionVar {
    pub(crate) name: String,
    pub(crate) domain: Domain,
}

/// Constraint classification computed when the model is closed.
#[derive(Debug, Clone, Default)]
pub(crate) struct Compiled {
    /// `slack >= expr` rules per dimension and index.
    pub(crate) slack_rules: Vec<Vec<Vec<Expr>>>,
    /// `var >= expr` rules of range decision variables.
    pub(crate) range_rules: Vec<Vec<Expr>>,
    /// Constraints reading only vehicle variables and one value-set decision.
    pub(crate) static_rules: Vec<Vec<usize>>,
    /// Constraints checked once the schedule is known.
    pub(crate) checked: Vec<usize>,
    /// Visit groups: every disjunction plus one mandatory singleton per
    /// interior index outside any disjunction.
    pub(crate) groups: Vec<Disjunction>,
    pub(crate) group_of: Vec<usize>,
}

/// A vehicle routing model over integer dimensions.
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::{RoutingModel, SearchParameters};
///
/// // nodes 0 and 1 are stops, node 2 is the depot
/// let coords = [0i64, 5, 1];
/// let mut model = RoutingModel::new(3, 1, &[(2, 2)]);
/// let time = model.add_dimension(
///     Box::new(move |a: usize, b: usize| (coords[a] - coords[b]).abs()),
///     0,
///     1_000,
///     true,
///     "time",
/// );
/// model.dimension_mut("time").unwrap().set_span_cost_coefficient_for_all_vehicles(1);
///
/// let params = SearchParameters::default().with_solution_limit(100);
/// let assignment = model.solve_with_parameters(&params).unwrap();
/// assert_eq!(assignment.objective_value(), 10);
/// assert_eq!(assignment.route(0).len(), 4);
/// assert_eq!(time, 0);
/// ```
pub struct RoutingModel<'a> {
    num_nodes: usize,
    num_vehicles: usize,
    num_interior: usize,
    index_to_node: Vec<usize>,
    node_to_index: Vec<usize>,
    dimensions: Vec<Dimension<'a>>,
    vehicle_domains: Vec<Vec<bool>>,
    disjunctions: Vec<Disjunction>,
    fixed_costs: Vec<i64>,
    decisions: Vec<DecisionVar>,
    constraints: Vec<Constraint>,
    finalizer: Vec<Expr>,
    tracked: Vec<IntVar>,
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
    compiled: Compiled,
}

impl<'a> RoutingModel<'a> {
    /// Creates a model over `num_nodes` nodes; `starts_ends[v]` holds the
    /// start and end node of vehicle `v`.
    pub fn new(num_nodes: usize, num_vehicles: usize, starts_ends: &[(usize, usize)]) -> Self {
        let mut is_anchor = vec![false; num_nodes];
        for &(start, end) in starts_ends {
            is_anchor[start] = true;
            is_anchor[end] = true;
        }
        let mut index_to_node: Vec<usize> = (0..num_nodes).filter(|&n| !is_anchor[n]).collect();
        let num_interior = index_to_node.len();
        index_to_node.extend(starts_ends.iter().map(|&(start, _)| start));
        index_to_node.extend(starts_ends.iter().map(|&(_, end)| end));

        let mut node_to_index = vec![usize::MAX; num_nodes];
        for (index, &node) in index_to_node.iter().enumerate() {
            if node_to_index[node] == usize::MAX {
                node_to_index[node] = index;
            }
        }

        Self {
            num_nodes,
            num_vehicles,
            num_interior,
            index_to_node,
            node_to_index,
            dimensions: Vec::new(),
            vehicle_domains: vec![vec![true; num_vehicles]; num_interior],
            disjunctions: Vec::new(),
            fixed_costs: vec![0; num_vehicles],
            decisions: Vec::new(),
            constraints: Vec::new(),
            finalizer: Vec::new(),
            tracked: Vec::new(),
            monitors: Vec::new(),
            compiled: Compiled::default(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of indices that have a successor (interior plus starts).
    pub fn size(&self) -> usize {
        self.num_interior + self.num_vehicles
    }

    /// Number of indices, ends included.
    pub fn num_indices(&self) -> usize {
        self.num_interior + 2 * self.num_vehicles
    }

    pub fn num_interior(&self) -> usize {
        self.num_interior
    }

    pub fn node_to_index(&self, node: usize) -> usize {
        self.node_to_index[node]
    }

    pub fn index_to_node(&self, index: usize) -> usize {
        self.index_to_node[index]
    }

    pub fn start(&self, vehicle: usize) -> usize {
        self.num_interior + vehicle
    }

    pub fn end(&self, vehicle: usize) -> usize {
        self.num_interior + self.num_vehicles + vehicle
    }

    pub fn is_start(&self, index: usize) -> bool {
        (self.num_interior..self.size()).contains(&index)
    }

    pub fn is_end(&self, index: usize) -> bool {
        (self.size()..self.num_indices()).contains(&index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.num_indices() {
            Ok(())
        } else {
            Err(RoutingError::IndexOutOfRange {
                index,
                size: self.num_indices(),
            })
        }
    }

    fn check_vehicle(&self, vehicle: usize) -> Result<()> {
        if vehicle < self.num_vehicles {
            Ok(())
        } else {
            Err(RoutingError::VehicleOutOfRange {
                vehicle,
                vehicles: self.num_vehicles,
            })
        }
    }

    /// Registers a dimension with one transit callback per vehicle.
    pub fn add_dimension_with_vehicle_transits(
        &mut self,
        transits: Vec<Transit<'a>>,
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> Result<DimensionId> {
        if transits.len() != self.num_vehicles {
            return Err(RoutingError::TransitCount {
                expected: self.num_vehicles,
                found: transits.len(),
            });
        }
        let vehicle_transit = (0..self.num_vehicles).collect();
        Ok(self.push_dimension(transits, vehicle_transit, slack_max, capacity, fix_start_cumul_to_zero, name))
    }

    /// Registers a dimension whose transit is shared by all vehicles.
    pub fn add_dimension(
        &mut self,
        transit: Transit<'a>,
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> DimensionId {
        let vehicle_transit = vec![0; self.num_vehicles];
        self.push_dimension(vec![transit], vehicle_transit, slack_max, capacity, fix_start_cumul_to_zero, name)
    }

    fn push_dimension(
        &mut self,
        transits: Vec<Transit<'a>>,
        vehicle_transit: Vec<usize>,
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> DimensionId {
        let starts = (0..self.num_vehicles).map(|v| self.start(v)).collect();
        let ends = (0..self.num_vehicles).map(|v| self.end(v)).collect();
        self.dimensions.push(Dimension::new(
            name.to_string(),
            transits,
            vehicle_transit,
            slack_max,
            capacity,
            fix_start_cumul_to_zero,
            self.num_indices(),
            starts,
            ends,
        ));
        self.dimensions.len() - 1
    }

    pub fn dimensions(&self) -> &[Dimension<'a>] {
        &self.dimensions
    }

    pub fn dimension_id(&self, name: &str) -> Result<DimensionId> {
        self.dimensions
            .iter()
            .position(|d| d.name() == name)
            .ok_or_else(|| RoutingError::UnknownDimension(name.to_string()))
    }

    pub fn dimension(&self, name: &str) -> Result<&Dimension<'a>> {
        let id = self.dimension_id(name)?;
        Ok(&self.dimensions[id])
    }

    pub fn dimension_mut(&mut self, name: &str) -> Result<&mut Dimension<'a>> {
        let id = self.dimension_id(name)?;
        Ok(&mut self.dimensions[id])
    }

    pub fn cumul_var(&self, dimension: &str, index: usize) -> Result<IntVar> {
        self.check_index(index)?;
        Ok(IntVar::Cumul {
            dimension: self.dimension_id(dimension)?,
            index,
        })
    }

    pub fn slack_var(&self, dimension: &str, index: usize) -> Result<IntVar> {
        self.check_index(index)?;
        Ok(IntVar::Slack {
            dimension: self.dimension_id(dimension)?,
            index,
        })
    }

    pub fn vehicle_var(&self, index: usize) -> Result<IntVar> {
        self.check_index(index)?;
        Ok(IntVar::Vehicle(index))
    }

    /// Creates a free integer variable with domain `[min, max]`.
    pub fn new_int_var(&mut self, min: i64, max: i64, name: &str) -> IntVar {
        self.decisions.push(DecisionVar {
            name: name.to_string(),
            domain: Domain::Range { min, max },
        });
        IntVar::Decision(self.decisions.len() - 1)
    }

    /// Name given to a decision variable when it was created.
    pub fn decision_name(&self, var: IntVar) -> Option<&str> {
        match var {
            IntVar::Decision(k) => self.decisions.get(k).map(|d| d.name.as_str()),
            _ => None,
        }
    }

    /// Restricts a decision variable to an explicit set of values.
    pub fn set_values(&mut self, var: IntVar, values: Vec<i64>) -> Result<()> {
        match var {
            IntVar::Decision(k) if k < self.decisions.len() => {
                self.decisions[k].domain = Domain::Values(values);
                Ok(())
            }
            other => Err(RoutingError::NotADecisionVariable(format!("{other:?}"))),
        }
    }

    /// Forbids vehicle `vehicle` at interior index `index`.
    pub fn remove_vehicle(&mut self, index: usize, vehicle: usize) -> Result<()> {
        self.check_vehicle(vehicle)?;
        if index >= self.num_interior {
            return Err(RoutingError::IndexOutOfRange {
                index,
                size: self.num_interior,
            });
        }
        self.vehicle_domains[index][vehicle] = false;
        Ok(())
    }

    /// Returns `true` if `vehicle` may serve `index`. Anchors belong to
    /// their own vehicle only.
    pub fn allows_vehicle(&self, index: usize, vehicle: usize) -> bool {
        if index < self.num_interior {
            self.vehicle_domains[index][vehicle]
        } else if self.is_start(index) {
            index - self.num_interior == vehicle
        } else {
            index - self.size() == vehicle
        }
    }

    /// Adds a disjunction over interior indices. An index belongs to at
    /// most one disjunction.
    pub fn add_disjunction(&mut self, indices: Vec<usize>, penalty: Option<i64>) -> usize {
        self.disjunctions.push(Disjunction { indices, penalty });
        self.disjunctions.len() - 1
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    pub fn set_fixed_cost_of_vehicle(&mut self, cost: i64, vehicle: usize) -> Result<()> {
        self.check_vehicle(vehicle)?;
        self.fixed_costs[vehicle] = cost;
        Ok(())
    }

    pub fn fixed_cost_of_vehicle(&self, vehicle: usize) -> i64 {
        self.fixed_costs[vehicle]
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Registers a quantity whose value is minimized among equally good
    /// solutions.
    pub fn add_variable_minimized_by_finalizer(&mut self, expr: impl Into<Expr>) {
        self.finalizer.push(expr.into());
    }

    /// Keeps the resolved value of `var` in the returned assignment.
    pub fn add_to_assignment(&mut self, var: IntVar) {
        self.tracked.push(var);
    }

    pub fn add_search_monitor(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Cost of driving `vehicle` from one index to the next: the sum of the
    /// span-cost-weighted transits of every dimension.
    pub fn arc_cost(&self, vehicle: usize, from: usize, to: usize) -> i64 {
        let (a, b) = (self.index_to_node[from], self.index_to_node[to]);
        self.dimensions.iter().fold(0i64, |acc, d| {
            let coefficient = d.span_cost_coefficient(vehicle);
            if coefficient == 0 {
                acc
            } else {
                acc.saturating_add(coefficient.saturating_mul(d.transit(vehicle, a, b)))
            }
        })
    }

    pub(crate) fn decisions(&self) -> &[DecisionVar] {
        &self.decisions
    }

    pub(crate) fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn finalizer(&self) -> &[Expr] {
        &self.finalizer
    }

    pub(crate) fn tracked(&self) -> &[IntVar] {
        &self.tracked
    }

    pub(crate) fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    /// Folds constant cumul bounds into the dimensions and classifies the
    /// remaining constraints for the evaluator. Closing twice is harmless.
    pub fn close(&mut self) {
        let mut compiled = Compiled {
            slack_rules: vec![vec![Vec::new(); self.num_indices()]; self.dimensions.len()],
            range_rules: vec![Vec::new(); self.decisions.len()],
            static_rules: vec![Vec::new(); self.decisions.len()],
            ..Compiled::default()
        };

        for (id, constraint) in self.constraints.iter().enumerate() {
            if let Some((var, bound)) = constraint.as_lower_bound() {
                match (var, bound) {
                    (IntVar::Cumul { dimension, index }, Expr::Const(value)) => {
                        self.dimensions[dimension].set_cumul_min(index, *value);
                        continue;
                    }
                    (IntVar::Slack { dimension, index }, expr) => {
                        compiled.slack_rules[dimension][index].push(expr.clone());
                        continue;
                    }
                    (IntVar::Decision(k), expr)
                        if matches!(self.decisions[k].domain, Domain::Range { .. }) =>
                    {
                        compiled.range_rules[k].push(expr.clone());
                        continue;
                    }
                    _ => {}
                }
            }
            if let Some((IntVar::Cumul { dimension, index }, Expr::Const(value))) =
                constraint.as_upper_bound()
            {
                self.dimensions[dimension].set_cumul_max(index, *value);
                continue;
            }

            let vars = constraint.vars();
            let decisions: Vec<usize> = vars
                .iter()
                .filter_map(|var| match var {
                    IntVar::Decision(k) => Some(*k),
                    _ => None,
                })
                .collect();
            let only_vehicles = vars
                .iter()
                .all(|var| matches!(var, IntVar::Vehicle(_) | IntVar::Decision(_)));
            if only_vehicles
                && decisions.len() == 1
                && matches!(self.decisions[decisions[0]].domain, Domain::Values(_))
            {
                compiled.static_rules[decisions[0]].push(id);
            } else {
                compiled.checked.push(id);
            }
        }

        let mut group_of = vec![usize::MAX; self.num_interior];
        let mut groups = Vec::new();
        for disjunction in &self.disjunctions {
            let members: Vec<usize> = disjunction
                .indices
                .iter()
                .copied()
                .filter(|&i| i < self.num_interior && group_of[i] == usize::MAX)
                .collect();
            if members.is_empty() {
                continue;
            }
            for &i in &members {
                group_of[i] = groups.len();
            }
            groups.push(Disjunction {
                indices: members,
                penalty: disjunction.penalty,
            });
        }
        for (i, group) in group_of.iter_mut().enumerate() {
            if *group == usize::MAX {
                *group = groups.len();
                groups.push(Disjunction {
                    indices: vec![i],
                    penalty: None,
                });
            }
        }
        compiled.groups = groups;
        compiled.group_of = group_of;

        debug!(
            dimensions = self.dimensions.len(),
            decisions = self.decisions.len(),
            checked = compiled.checked.len(),
            groups = compiled.groups.len(),
            "model closed"
        );
        self.compiled = compiled;
    }

    /// Closes the model and runs the search. The model is consumed: a
    /// model is solved once.
    ///
    /// Returns `None` when no feasible first solution exists.
    pub fn solve_with_parameters(mut self, params: &SearchParameters) -> Option<Assignment> {
        self.close();
        let mut monitors = std::mem::take(&mut self.monitors);
        search::run(&self, params, &mut monitors)
    }
}

impl std::fmt::Debug for RoutingModel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingModel")
            .field("num_nodes", &self.num_nodes)
            .field("num_vehicles", &self.num_vehicles)
            .field("dimensions", &self.dimensions)
            .field("disjunctions", &self.disjunctions.len())
            .field("constraints", &self.constraints.len())
            .finish_non_exhaustive()
    }
}
