use archsched_core::{
    ManualClock, ScheduleBoard, Task, TaskKind, REORDER_STEP,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn row(id: &str, kind: TaskKind, key: f64) -> Task {
    let day = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
    let mut task = Task::with_id(id, kind, id.to_uppercase(), day, day);
    task.sort_key = key;
    task
}

fn board(tasks: Vec<Task>) -> ScheduleBoard {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
    ));
    ScheduleBoard::from_tasks(tasks, clock).unwrap()
}

fn order(board: &ScheduleBoard) -> Vec<String> {
    board
        .sorted_tasks()
        .iter()
        .map(|task| task.id.clone())
        .collect()
}

#[test]
fn dragging_last_task_between_first_two_lands_on_midpoint() {
    let mut board = board(vec![
        row("a", TaskKind::Task, 0.0),
        row("b", TaskKind::Task, 1.0),
        row("c", TaskKind::Task, 2.0),
    ]);

    let key = board.reorder("c", "b").unwrap();

    assert_eq!(key, Some(0.5));
    assert_eq!(board.get("c").unwrap().sort_key, 0.5);
    assert_eq!(board.get("a").unwrap().sort_key, 0.0);
    assert_eq!(board.get("b").unwrap().sort_key, 1.0);
    assert_eq!(order(&board), vec!["a", "c", "b"]);
}

#[test]
fn midpoint_between_huge_keys_stays_finite() {
    let mut board = board(vec![
        row("a", TaskKind::Task, 1e308),
        row("b", TaskKind::Task, 1.5e308),
        row("c", TaskKind::Task, 1.7e308),
    ]);

    let key = board.reorder("c", "b").unwrap().unwrap();

    assert!(key.is_finite());
    assert_eq!(key, 1e308 / 2.0 + 1.5e308 / 2.0);
    assert!(1e308 < key && key < 1.5e308);
    assert_eq!(order(&board), vec!["a", "c", "b"]);
}

#[test]
fn edge_steps_near_the_float_limits_stay_finite() {
    let mut board = board(vec![
        row("a", TaskKind::Task, -f64::MAX),
        row("b", TaskKind::Task, 0.0),
        row("c", TaskKind::Task, f64::MAX),
    ]);

    let first = board.reorder("b", "a").unwrap().unwrap();
    assert!(first.is_finite());
    let last = board.reorder("b", "c").unwrap().unwrap();
    assert!(last.is_finite());
}

#[test]
fn dropping_on_group_edges_steps_past_the_target() {
    let mut board = board(vec![
        row("a", TaskKind::Task, 0.0),
        row("b", TaskKind::Task, 1.0),
        row("c", TaskKind::Task, 2.0),
    ]);

    assert_eq!(board.reorder("b", "a").unwrap(), Some(-REORDER_STEP));
    assert_eq!(order(&board), vec!["b", "a", "c"]);

    assert_eq!(board.reorder("b", "c").unwrap(), Some(2.0 + REORDER_STEP));
    assert_eq!(order(&board), vec!["a", "c", "b"]);
}

#[test]
fn cross_type_and_self_drops_are_ignored() {
    let mut board = board(vec![
        row("m", TaskKind::Milestone, 0.0),
        row("t1", TaskKind::Task, 0.0),
        row("t2", TaskKind::Task, 1.0),
    ]);
    let before = order(&board);

    assert_eq!(board.reorder("t1", "m").unwrap(), None);
    assert_eq!(board.reorder("t2", "t2").unwrap(), None);
    assert_eq!(order(&board), before);
    assert_eq!(board.get("t1").unwrap().sort_key, 0.0);
}

#[test]
fn unknown_reorder_ids_are_not_found() {
    let mut board = board(vec![row("a", TaskKind::Task, 0.0)]);
    assert!(board.reorder("a", "ghost").is_err());
    assert!(board.reorder("ghost", "a").is_err());
}

#[test]
fn sorted_view_groups_by_kind_and_is_stable() {
    let board = board(vec![
        row("t1", TaskKind::Task, 0.0),
        row("s1", TaskKind::Stage, 5.0),
        row("t2", TaskKind::Task, 0.0),
        row("m1", TaskKind::Milestone, 3.0),
        row("s0", TaskKind::Stage, -1.0),
    ]);

    let first = order(&board);
    assert_eq!(first, vec!["m1", "s0", "s1", "t1", "t2"]);
    assert_eq!(order(&board), first);
}
