//! 2-opt operator.
//!
//! # Algorithm
//!
//! Reverses a segment `route[i..=j]` of one route, replacing the arcs
//! entering and leaving the segment. With asymmetric costs or time windows
//! the reversed segment is re-timed by the evaluator.
//!
//! # Complexity
//!
//! O(n²) moves per route.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use super::Move;
use crate::evaluation::Plan;

pub(super) fn moves(plan: &Plan) -> Vec<Move> {
    let mut moves = Vec::new();
    for (route, visits) in plan.routes().iter().enumerate() {
        for i in 0..visits.len() {
            for j in i + 1..visits.len() {
                moves.push(Move::TwoOpt { route, i, j });
            }
        }
    }
    moves
}

pub(super) fn apply(plan: &Plan, route: usize, i: usize, j: usize) -> Option<Plan> {
    let len = plan.routes().get(route)?.len();
    if i >= j || j >= len {
        return None;
    }
    let mut next = plan.clone();
    next.route_mut(route)[i..=j].reverse();
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_segment() {
        let plan = Plan::from_routes(vec![vec![0, 1, 2, 3]]);
        let next = apply(&plan, 0, 1, 3).expect("valid");
        assert_eq!(next.route(0), &[0, 3, 2, 1]);
    }

    #[test]
    fn test_moves_per_route() {
        let plan = Plan::from_routes(vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(moves(&plan).len(), 3);
        assert!(apply(&plan, 1, 0, 1).is_none());
    }
}
