//! Ordering rules for the todo list
//!
//! The `order` field is a rank key among active todos only. Completed todos
//! leave the ordering space and are sorted by completion time instead; the
//! gaps they leave behind are harmless.

use std::cmp::Ordering;

use uuid::Uuid;

use super::model::Todo;

/// Rank for a newly created todo: 1 + the highest rank among active todos,
/// or 0 when there are none.
pub fn next_order(todos: &[Todo]) -> i64 {
    todos
        .iter()
        .filter(|t| t.is_active())
        .map(|t| t.order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

/// List ordering: active before completed, active by rank, ties (and the
/// completed tail) by newest creation first.
pub fn list_cmp(a: &Todo, b: &Todo) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then(a.order.cmp(&b.order))
        .then(b.created_at.cmp(&a.created_at))
}

/// Plan a move of one active todo to a target position.
///
/// `active` must contain only active todos, already sorted by rank. The whole
/// list is renumbered sequentially with the moved todo at `position`
/// (clamped to the list bounds), so that reading it back sorted by `order`
/// yields the intended sequence. Returns the `(id, order)` assignments that
/// actually changed; empty when `id` is not in the list.
pub fn plan_move(active: &[Todo], id: Uuid, position: usize) -> Vec<(Uuid, i64)> {
    let Some(from) = active.iter().position(|t| t.id == id) else {
        return Vec::new();
    };

    let mut sequence: Vec<&Todo> = active.iter().collect();
    let moved = sequence.remove(from);
    let to = position.min(sequence.len());
    sequence.insert(to, moved);

    sequence
        .iter()
        .enumerate()
        .filter(|(rank, todo)| todo.order != *rank as i64)
        .map(|(rank, todo)| (todo.id, rank as i64))
        .collect()
}
