//! Local search neighborhoods over plans.
//!
//! - [`Move::Relocate`] — Move one visit to another position or route
//! - [`Move::Exchange`] — Swap two visits
//! - [`Move::TwoOpt`] — Reverse a segment of one route
//! - [`Move::OrOpt`] — Move a segment of 2-3 visits within its route
//! - [`Move::Activate`], [`Move::Deactivate`], [`Move::SwapActive`] — Change
//!   which member of an optional visit group is performed
//!
//! Moves only describe plan edits. Feasibility and cost are left to the
//! evaluator, so a move may yield an infeasible plan.

mod activation;
mod exchange;
mod or_opt;
mod relocate;
mod two_opt;

use crate::engine::RoutingModel;
use crate::evaluation::Plan;

/// A plan edit. Positions refer to the routes of the plan the move was
/// generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Removes the visit at `from_pos` and inserts it at `to_pos` of
    /// `to_route`, counted after the removal.
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Swaps two visits.
    Exchange {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    /// Reverses `route[i..=j]`.
    TwoOpt { route: usize, i: usize, j: usize },
    /// Moves `route[start..start + len]` to `to_pos` of the remaining route.
    OrOpt {
        route: usize,
        start: usize,
        len: usize,
        to_pos: usize,
    },
    /// Inserts an unperformed index.
    Activate { index: usize, route: usize, pos: usize },
    /// Removes a visit, leaving it unperformed.
    Deactivate { route: usize, pos: usize },
    /// Replaces the visit at `pos` by an unperformed index.
    SwapActive { route: usize, pos: usize, index: usize },
}

impl Move {
    /// Applies the move to a copy of `plan`.
    ///
    /// Returns `None` if a position does not exist in `plan`.
    pub fn apply(&self, plan: &Plan) -> Option<Plan> {
        match *self {
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => relocate::apply(plan, from_route, from_pos, to_route, to_pos),
            Move::Exchange {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => exchange::apply(plan, (route_a, pos_a), (route_b, pos_b)),
            Move::TwoOpt { route, i, j } => two_opt::apply(plan, route, i, j),
            Move::OrOpt {
                route,
                start,
                len,
                to_pos,
            } => or_opt::apply(plan, route, start, len, to_pos),
            Move::Activate { index, route, pos } => activation::activate(plan, index, route, pos),
            Move::Deactivate { route, pos } => activation::deactivate(plan, route, pos),
            Move::SwapActive { route, pos, index } => activation::swap_active(plan, route, pos, index),
        }
    }
}

/// All moves around `plan`, cheapest kinds first.
///
/// Moves placing a visit on a vehicle outside its domain are not generated.
pub fn neighborhood(model: &RoutingModel<'_>, plan: &Plan) -> Vec<Move> {
    let mut moves = Vec::new();
    moves.extend(two_opt::moves(plan));
    moves.extend(or_opt::moves(plan));
    moves.extend(relocate::moves(model, plan));
    moves.extend(exchange::moves(model, plan));
    moves.extend(activation::moves(model, plan));
    moves
}
