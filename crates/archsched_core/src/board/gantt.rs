//! Projection of the board into drawable Gantt rows.
//!
//! The rendering widget is an external surface; it receives rows in display
//! order and a calendar window wide enough to show every bar.

use crate::board::ordering::sorted_tasks;
use crate::model::task::{Task, TaskId, TaskKind, TaskStatus};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One drawable bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttRow {
    pub row_index: usize,
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: f64,
    pub status: TaskStatus,
    pub dependencies: Vec<TaskId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_stage_id: Option<TaskId>,
}

/// Calendar range the chart should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Rows in board display order.
pub fn gantt_rows(tasks: &[Task]) -> Vec<GanttRow> {
    sorted_tasks(tasks)
        .into_iter()
        .enumerate()
        .map(|(row_index, task)| GanttRow {
            row_index,
            id: task.id.clone(),
            name: task.name.clone(),
            kind: task.kind,
            start: task.start,
            end: task.end,
            progress: task.progress,
            status: task.status,
            dependencies: task.dependencies.clone(),
            parent_stage_id: task.parent_stage_id.clone(),
        })
        .collect()
}

/// Whole months spanning the earliest start to the latest end.
///
/// Returns `None` for an empty board.
pub fn display_window(tasks: &[Task]) -> Option<DisplayWindow> {
    let earliest = tasks.iter().map(|task| task.start).min()?;
    let latest = tasks.iter().map(|task| task.end).max()?;
    Some(DisplayWindow {
        start: first_day_of_month(earliest)?,
        end: last_day_of_month(latest)?,
    })
}

fn first_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month?.pred_opt()
}
