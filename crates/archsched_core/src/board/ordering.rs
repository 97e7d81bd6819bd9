//! Display ordering within type-groups.
//!
//! # Responsibility
//! - Produce the board display order: milestones, then stages, then tasks,
//!   each group ascending by `sort_key`.
//! - Compute the new key for a drag-and-drop reorder without renumbering.
//!
//! # Invariants
//! - Sorting is stable; equal keys keep insertion order.
//! - A reorder assigns exactly one key (the dragged entity's).

use crate::model::task::Task;

/// Distance used when placing an entity before the first or after the last
/// member of its group.
pub const REORDER_STEP: f64 = 1000.0;

/// Returns `tasks` in board display order.
pub fn sorted_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.sort_key.total_cmp(&b.sort_key))
    });
    sorted
}

/// Computes the key `dragged` receives when dropped onto `target`.
///
/// Returns `None` for drops across type-groups or onto itself.
///
/// - Target first in its group: `target - REORDER_STEP`.
/// - Target last in its group: `target + REORDER_STEP`.
/// - Otherwise: midpoint between the target's predecessor and the target, so
///   the dragged entity lands directly before the target.
pub fn reorder_key(sorted: &[&Task], dragged: &Task, target: &Task) -> Option<f64> {
    if dragged.kind != target.kind || dragged.id == target.id {
        return None;
    }

    let group: Vec<&Task> = sorted
        .iter()
        .copied()
        .filter(|task| task.kind == target.kind)
        .collect();
    let index = group.iter().position(|task| task.id == target.id)?;

    let prev = index.checked_sub(1).map(|i| group[i]);
    let next = group.get(index + 1);

    let key = match (prev, next) {
        (None, _) => target.sort_key - REORDER_STEP,
        (Some(_), None) => target.sort_key + REORDER_STEP,
        (Some(prev), Some(_)) => prev.sort_key / 2.0 + target.sort_key / 2.0,
    };
    Some(key)
}
