//! Offline board inspection.
//!
//! Reads a board export (`{"tasks": [...]}`), validates it and prints the
//! rows in display order followed by overdue milestone alerts.

use anyhow::Context;
use archsched_core::{
    display_window, gantt_rows, Clock, DisplayWindow, GanttRow, ManualClock, MilestoneAlert,
    ScheduleBoard, SystemClock, Task,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "archsched",
    version,
    about = "Print a schedule board in display order with its milestone alerts.",
    long_about = None
)]
struct CliArgs {
    /// Board export containing a `tasks` array.
    #[arg(value_name = "BOARD_JSON")]
    board: PathBuf,

    /// Evaluate alerts at this instant (RFC 3339) instead of now.
    #[arg(long, value_name = "RFC3339")]
    now: Option<DateTime<Utc>>,

    /// Emit rows, window and alerts as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct BoardFile {
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardReport<'a> {
    rows: Vec<GanttRow>,
    window: Option<DisplayWindow>,
    alerts: &'a [MilestoneAlert],
}

fn main() {
    if let Err(err) = run_main() {
        eprintln!("archsched error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let raw = std::fs::read_to_string(&args.board)
        .with_context(|| format!("failed to read {}", args.board.display()))?;
    let file: BoardFile = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a board export", args.board.display()))?;

    let clock: Arc<dyn Clock> = match args.now {
        Some(now) => Arc::new(ManualClock::new(now)),
        None => Arc::new(SystemClock),
    };
    let board = ScheduleBoard::from_tasks(file.tasks, clock).context("invalid board")?;

    let output = if args.json {
        let report = BoardReport {
            rows: gantt_rows(board.tasks()),
            window: display_window(board.tasks()),
            alerts: board.alerts(),
        };
        serde_json::to_string_pretty(&report)?
    } else {
        render_text(&board)
    };
    println!("{output}");
    Ok(())
}

fn render_text(board: &ScheduleBoard) -> String {
    let mut out = String::new();
    if let Some(window) = display_window(board.tasks()) {
        let _ = writeln!(out, "window {} .. {}", window.start, window.end);
    }
    for row in gantt_rows(board.tasks()) {
        let _ = writeln!(
            out,
            "{:>3}  {:<9} {} .. {}  {:>3}%  {:<11}  {}",
            row.row_index,
            row.kind.as_str(),
            row.start,
            row.end,
            (row.progress * 100.0).round(),
            row.status.as_str(),
            row.name
        );
    }

    if board.alerts().is_empty() {
        out.push_str("no overdue milestones\n");
    }
    for alert in board.alerts() {
        let _ = writeln!(
            out,
            "overdue: {} (due {}) waiting on {}",
            alert.milestone_name,
            alert.due_date,
            alert.incomplete_task_names.join(", ")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_text, BoardFile, CliArgs};
    use archsched_core::{ManualClock, ScheduleBoard};
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use std::sync::Arc;

    const BOARD: &str = r#"{"tasks": [
        {"id": "task_1", "name": "Drawings", "type": "task", "start": "2025-03-03",
         "end": "2025-03-07", "milestoneId": "milestone_1"},
        {"id": "milestone_1", "name": "Submission", "type": "milestone",
         "start": "2025-03-10", "end": "2025-03-10"}
    ]}"#;

    fn board(now: (i32, u32, u32)) -> ScheduleBoard {
        let file: BoardFile = serde_json::from_str(BOARD).unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(now.0, now.1, now.2, 12, 0, 0).unwrap(),
        ));
        ScheduleBoard::from_tasks(file.tasks, clock).unwrap()
    }

    #[test]
    fn text_lists_milestones_first_and_alerts() {
        let text = render_text(&board((2025, 3, 11)));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "window 2025-03-01 .. 2025-03-31");
        assert!(lines[1].contains("milestone"));
        assert!(lines[2].contains("Drawings"));
        assert_eq!(
            lines[3],
            "overdue: Submission (due 2025-03-10) waiting on Drawings"
        );
    }

    #[test]
    fn text_reports_no_alerts_before_due_date() {
        let text = render_text(&board((2025, 3, 9)));
        assert!(text.ends_with("no overdue milestones\n"));
    }

    #[test]
    fn now_flag_parses_rfc3339() {
        let args =
            CliArgs::try_parse_from(["archsched", "board.json", "--now", "2025-03-11T00:00:00Z"])
                .unwrap();
        assert_eq!(
            args.now,
            Some(Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap())
        );
        assert!(CliArgs::try_parse_from(["archsched", "board.json", "--now", "tuesday"]).is_err());
    }
}
