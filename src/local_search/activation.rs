//! Moves that change which visits are performed.
//!
//! # Algorithm
//!
//! For every visit group:
//!
//! - unserved: activate any member at any position of an allowed route;
//! - served and optional: deactivate the performed member;
//! - served with several members: swap the performed member for another
//!   one in place.

use super::Move;
use crate::engine::RoutingModel;
use crate::evaluation::Plan;

pub(super) fn moves(model: &RoutingModel<'_>, plan: &Plan) -> Vec<Move> {
    let mut location = vec![None; model.num_indices()];
    for (route, visits) in plan.routes().iter().enumerate() {
        for (pos, &index) in visits.iter().enumerate() {
            if let Some(slot) = location.get_mut(index) {
                *slot = Some((route, pos));
            }
        }
    }

    let mut moves = Vec::new();
    for group in &model.compiled().groups {
        let performed = group
            .indices()
            .iter()
            .find_map(|&i| location[i].map(|(route, pos)| (i, route, pos)));
        match performed {
            None => {
                for &index in group.indices() {
                    for (route, visits) in plan.routes().iter().enumerate() {
                        if !model.allows_vehicle(index, route) {
                            continue;
                        }
                        for pos in 0..=visits.len() {
                            moves.push(Move::Activate { index, route, pos });
                        }
                    }
                }
            }
            Some((active, route, pos)) => {
                if !group.is_mandatory() {
                    moves.push(Move::Deactivate { route, pos });
                }
                for &index in group.indices() {
                    if index != active && model.allows_vehicle(index, route) {
                        moves.push(Move::SwapActive { route, pos, index });
                    }
                }
            }
        }
    }
    moves
}

pub(super) fn activate(plan: &Plan, index: usize, route: usize, pos: usize) -> Option<Plan> {
    if pos > plan.routes().get(route)?.len() {
        return None;
    }
    Some(plan.with_inserted(route, pos, index))
}

pub(super) fn deactivate(plan: &Plan, route: usize, pos: usize) -> Option<Plan> {
    plan.routes().get(route)?.get(pos)?;
    let mut next = plan.clone();
    next.route_mut(route).remove(pos);
    Some(next)
}

pub(super) fn swap_active(plan: &Plan, route: usize, pos: usize, index: usize) -> Option<Plan> {
    let current = *plan.routes().get(route)?.get(pos)?;
    if current == index {
        return None;
    }
    let mut next = plan.clone();
    next.route_mut(route)[pos] = index;
    Some(next)
}
