//! Exchange operator.
//!
//! # Algorithm
//!
//! Swaps the positions of two visits, either within one route or between
//! the routes of two vehicles that may serve both.
//!
//! # Complexity
//!
//! O(n²) moves where n = performed visits.

use super::Move;
use crate::engine::RoutingModel;
use crate::evaluation::Plan;

pub(super) fn moves(model: &RoutingModel<'_>, plan: &Plan) -> Vec<Move> {
    let visits: Vec<(usize, usize, usize)> = plan
        .routes()
        .iter()
        .enumerate()
        .flat_map(|(r, route)| route.iter().enumerate().map(move |(p, &i)| (r, p, i)))
        .collect();

    let mut moves = Vec::new();
    for (a, &(route_a, pos_a, index_a)) in visits.iter().enumerate() {
        for &(route_b, pos_b, index_b) in &visits[a + 1..] {
            if route_a != route_b
                && !(model.allows_vehicle(index_a, route_b) && model.allows_vehicle(index_b, route_a))
            {
                continue;
            }
            moves.push(Move::Exchange {
                route_a,
                pos_a,
                route_b,
                pos_b,
            });
        }
    }
    moves
}

pub(super) fn apply(plan: &Plan, (route_a, pos_a): (usize, usize), (route_b, pos_b): (usize, usize)) -> Option<Plan> {
    let a = *plan.routes().get(route_a)?.get(pos_a)?;
    let b = *plan.routes().get(route_b)?.get(pos_b)?;
    if (route_a, pos_a) == (route_b, pos_b) {
        return None;
    }
    let mut next = plan.clone();
    next.route_mut(route_a)[pos_a] = b;
    next.route_mut(route_b)[pos_b] = a;
    Some(next)
}
