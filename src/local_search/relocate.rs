//! Relocate operator.
//!
//! # Algorithm
//!
//! Moves a single visit to any other position, in its own route or in the
//! route of another vehicle allowed to serve it.
//!
//! # Complexity
//!
//! O(n²) moves where n = performed visits.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Move;
use crate::engine::RoutingModel;
use crate::evaluation::Plan;

pub(super) fn moves(model: &RoutingModel<'_>, plan: &Plan) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from_route, route) in plan.routes().iter().enumerate() {
        for (from_pos, &index) in route.iter().enumerate() {
            for (to_route, target) in plan.routes().iter().enumerate() {
                if !model.allows_vehicle(index, to_route) {
                    continue;
                }
                let slots = if to_route == from_route {
                    target.len()
                } else {
                    target.len() + 1
                };
                for to_pos in 0..slots {
                    if to_route == from_route && to_pos == from_pos {
                        continue;
                    }
                    moves.push(Move::Relocate {
                        from_route,
                        from_pos,
                        to_route,
                        to_pos,
                    });
                }
            }
        }
    }
    moves
}

pub(super) fn apply(
    plan: &Plan,
    from_route: usize,
    from_pos: usize,
    to_route: usize,
    to_pos: usize,
) -> Option<Plan> {
    let index = *plan.routes().get(from_route)?.get(from_pos)?;
    let mut next = plan.clone();
    next.route_mut(from_route).remove(from_pos);
    let target = next.routes().get(to_route)?;
    if to_pos > target.len() {
        return None;
    }
    next.route_mut(to_route).insert(to_pos, index);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_within_route() {
        let plan = Plan::from_routes(vec![vec![0, 1, 2]]);
        let next = apply(&plan, 0, 0, 0, 2).expect("valid");
        assert_eq!(next.route(0), &[1, 2, 0]);
    }

    #[test]
    fn test_apply_across_routes() {
        let plan = Plan::from_routes(vec![vec![0, 1], vec![2]]);
        let next = apply(&plan, 0, 1, 1, 0).expect("valid");
        assert_eq!(next.route(0), &[0]);
        assert_eq!(next.route(1), &[1, 2]);
        assert!(apply(&plan, 0, 1, 1, 2).is_none());
    }

    #[test]
    fn test_move_count() {
        let m = RoutingModel::new(4, 2, &[(3, 3), (3, 3)]);
        let plan = Plan::from_routes(vec![vec![0, 1], vec![2]]);
        // 0 and 1: one intra slot and two inter slots each; 2: three slots
        assert_eq!(moves(&m, &plan).len(), 3 + 3 + 3);
    }
}
