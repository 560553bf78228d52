//! Or-opt operator.
//!
//! # Algorithm
//!
//! Moves a segment of 2 or 3 consecutive visits to another position of the
//! same route, keeping its orientation. Single visits are covered by
//! relocate.
//!
//! # Complexity
//!
//! O(n²) moves per route.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Move;
use crate::evaluation::Plan;

const SEGMENT_LENGTHS: [usize; 2] = [2, 3];

pub(super) fn moves(plan: &Plan) -> Vec<Move> {
    let mut moves = Vec::new();
    for (route, visits) in plan.routes().iter().enumerate() {
        for len in SEGMENT_LENGTHS {
            if len >= visits.len() {
                continue;
            }
            for start in 0..=visits.len() - len {
                // slots in the route without the segment
                for to_pos in 0..=visits.len() - len {
                    if to_pos != start {
                        moves.push(Move::OrOpt {
                            route,
                            start,
                            len,
                            to_pos,
                        });
                    }
                }
            }
        }
    }
    moves
}

pub(super) fn apply(plan: &Plan, route: usize, start: usize, len: usize, to_pos: usize) -> Option<Plan> {
    let visits = plan.routes().get(route)?;
    let end = start.checked_add(len)?;
    if len == 0 || end > visits.len() || to_pos > visits.len() - len || to_pos == start {
        return None;
    }
    let mut rest = visits.clone();
    let segment: Vec<usize> = rest.drain(start..end).collect();
    rest.splice(to_pos..to_pos, segment);

    let mut next = plan.clone();
    *next.route_mut(route) = rest;
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_segment_forward() {
        let plan = Plan::from_routes(vec![vec![0, 1, 2, 3, 4]]);
        let next = apply(&plan, 0, 0, 2, 3).expect("valid");
        assert_eq!(next.route(0), &[2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_move_segment_backward() {
        let plan = Plan::from_routes(vec![vec![0, 1, 2, 3, 4]]);
        let next = apply(&plan, 0, 2, 3, 0).expect("valid");
        assert_eq!(next.route(0), &[2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_short_routes_have_no_moves() {
        let plan = Plan::from_routes(vec![vec![0, 1], vec![2]]);
        assert!(moves(&plan).is_empty());
        assert!(apply(&plan, 0, 0, 2, 0).is_none());
    }
}
