//! Candidate routing plans.

use crate::engine::RoutingModel;

/// Interior indices visited by each vehicle, in order.
///
/// A plan says nothing about schedules; the
/// [`Evaluator`](super::Evaluator) derives those.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::Plan;
///
/// let mut plan = Plan::new(2);
/// plan.route_mut(1).extend([3, 0]);
/// let moved = plan.with_inserted(0, 0, 2);
/// assert_eq!(moved.route(0), &[2]);
/// assert_eq!(moved.num_performed(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    routes: Vec<Vec<usize>>,
}

impl Plan {
    /// A plan with every vehicle idle.
    pub fn new(num_vehicles: usize) -> Self {
        Self {
            routes: vec![Vec::new(); num_vehicles],
        }
    }

    pub fn from_routes(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    pub fn route_mut(&mut self, vehicle: usize) -> &mut Vec<usize> {
        &mut self.routes[vehicle]
    }

    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    pub fn num_performed(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Flags of performed indices, sized for `num_indices`.
    pub fn performed(&self, num_indices: usize) -> Vec<bool> {
        let mut flags = vec![false; num_indices];
        for &i in self.routes.iter().flatten() {
            if let Some(flag) = flags.get_mut(i) {
                *flag = true;
            }
        }
        flags
    }

    /// The full path of `vehicle`, start and end indices included.
    pub fn path(&self, model: &RoutingModel<'_>, vehicle: usize) -> Vec<usize> {
        let route = &self.routes[vehicle];
        let mut path = Vec::with_capacity(route.len() + 2);
        path.push(model.start(vehicle));
        path.extend_from_slice(route);
        path.push(model.end(vehicle));
        path
    }

    /// Arcs `(vehicle, from, to)` driven by used vehicles.
    pub fn arcs(&self, model: &RoutingModel<'_>) -> Vec<(usize, usize, usize)> {
        let mut arcs = Vec::new();
        for (v, route) in self.routes.iter().enumerate() {
            if route.is_empty() {
                continue;
            }
            let path = self.path(model, v);
            arcs.extend(path.windows(2).map(|w| (v, w[0], w[1])));
        }
        arcs
    }

    /// Copy of the plan with `index` inserted at `position` of `vehicle`.
    pub fn with_inserted(&self, vehicle: usize, position: usize, index: usize) -> Plan {
        let mut plan = self.clone();
        plan.routes[vehicle].insert(position, index);
        plan
    }

    /// Total cost of the plan's arcs.
    pub fn arc_cost(&self, model: &RoutingModel<'_>) -> i64 {
        self.arcs(model)
            .into_iter()
            .fold(0i64, |acc, (v, a, b)| acc.saturating_add(model.arc_cost(v, a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RoutingModel<'static> {
        let mut m = RoutingModel::new(5, 1, &[(3, 4)]);
        m.add_dimension(Box::new(|a: usize, b: usize| (a as i64 - b as i64).abs()), 0, 100, true, "d");
        if let Ok(d) = m.dimension_mut("d") {
            d.set_span_cost_coefficient_for_all_vehicles(1);
        }
        m
    }

    #[test]
    fn test_path_and_arcs() {
        let m = model();
        let plan = Plan::from_routes(vec![vec![0, 2]]);
        assert_eq!(plan.path(&m, 0), vec![3, 0, 2, 4]);
        assert_eq!(plan.arcs(&m), vec![(0, 3, 0), (0, 0, 2), (0, 2, 4)]);
        // nodes 3 -> 0 -> 2 -> 4
        assert_eq!(plan.arc_cost(&m), 3 + 2 + 2);
    }

    #[test]
    fn test_idle_vehicle_has_no_arcs() {
        let m = model();
        let plan = Plan::new(1);
        assert!(plan.arcs(&m).is_empty());
        assert_eq!(plan.arc_cost(&m), 0);
    }

    #[test]
    fn test_performed_flags() {
        let plan = Plan::from_routes(vec![vec![2], vec![0]]);
        assert_eq!(plan.performed(4), vec![true, false, true, false]);
    }
}
