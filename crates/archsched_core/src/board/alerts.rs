//! Overdue milestone detection.
//!
//! # Responsibility
//! - Flag milestones whose due date has passed while tasks attached to them
//!   are still incomplete.
//!
//! # Invariants
//! - Full recomputation from the current task set; no incremental state.
//! - A milestone due exactly at `now` is not overdue (strict comparison).

use crate::model::task::{Task, TaskId, TaskKind};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// One overdue milestone with the names of its unfinished tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneAlert {
    pub milestone_id: TaskId,
    pub milestone_name: String,
    pub due_date: NaiveDate,
    /// Insertion order of the incomplete tasks.
    pub incomplete_task_names: Vec<String>,
}

/// Instant a milestone date falls due: the start of that day in UTC.
pub fn due_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Scans `tasks` for overdue milestones with incomplete dependents.
///
/// O(milestones x tasks); boards stay in the tens to low hundreds of rows.
pub fn milestone_alerts(tasks: &[Task], now: DateTime<Utc>) -> Vec<MilestoneAlert> {
    tasks
        .iter()
        .filter(|task| task.kind == TaskKind::Milestone && due_instant(task.end) < now)
        .filter_map(|milestone| {
            let incomplete_task_names: Vec<String> = tasks
                .iter()
                .filter(|task| {
                    task.kind == TaskKind::Task
                        && task.milestone_id.as_deref() == Some(milestone.id.as_str())
                        && !task.is_completed()
                })
                .map(|task| task.name.clone())
                .collect();

            if incomplete_task_names.is_empty() {
                return None;
            }
            Some(MilestoneAlert {
                milestone_id: milestone.id.clone(),
                milestone_name: milestone.name.clone(),
                due_date: milestone.end,
                incomplete_task_names,
            })
        })
        .collect()
}
