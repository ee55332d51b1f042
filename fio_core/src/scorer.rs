//! `scorer`: numeric score of one assignment.
//!
//! score = sum over placed roles of `role_weight(role) * confidence^2`.
//! Squaring favours one or two strong hits over many weak ones; the patronymic is
//! down-weighted since it is the component most often missing or confused.

use crate::{enumerator::Assignment, lookup::MatchTable, model::Role};

pub fn role_weight(role: Role) -> f64 {
    match role {
        Role::Given => 1.0,
        Role::Patronymic => 0.8,
        Role::Family => 1.0,
    }
}

/// Positions without a candidate contribute 0. Never negative.
pub fn score(assignment: &Assignment, table: &MatchTable) -> f64 {
    assignment
        .placements()
        .map(|(role, position)| {
            let c = table.confidence(position, role);
            role_weight(role) * c * c
        })
        .sum()
}
