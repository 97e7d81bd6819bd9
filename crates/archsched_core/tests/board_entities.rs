use archsched_core::{
    BoardError, ManualClock, ScheduleBoard, TaskInput, TaskKind, TaskPatch, TaskStatus,
    TaskValidationError,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn board() -> ScheduleBoard {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    ));
    ScheduleBoard::new(clock)
}

fn task_input(name: &str, stage: Option<&str>, dependencies: &[&str]) -> TaskInput {
    TaskInput::Task {
        name: name.to_string(),
        start: date(2025, 3, 3),
        end: date(2025, 3, 7),
        status: TaskStatus::NotStarted,
        progress: 0.0,
        parent_stage_id: stage.map(str::to_string),
        milestone_id: None,
        dependencies: dependencies.iter().map(|id| id.to_string()).collect(),
        sort_key: None,
    }
}

#[test]
fn create_assigns_prefixed_id_and_default_key() {
    let mut board = board();
    let task = board
        .create_task(TaskInput::task("  Site survey ", date(2025, 3, 3), date(2025, 3, 4)))
        .unwrap();

    assert!(task.id.starts_with("task_"));
    assert_eq!(task.name, "Site survey");
    assert_eq!(task.sort_key, 0.0);
    assert_eq!(task.status, TaskStatus::NotStarted);
    assert_eq!(board.len(), 1);
}

#[test]
fn create_rejects_inverted_dates_and_leaves_board_unchanged() {
    let mut board = board();
    let err = board
        .create_task(TaskInput::task("Backwards", date(2025, 3, 7), date(2025, 3, 3)))
        .unwrap_err();

    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::InvertedDates { .. })
    ));
    assert!(board.is_empty());
}

#[test]
fn update_rejects_inverted_dates_and_keeps_previous_record() {
    let mut board = board();
    let id = board
        .create_task(TaskInput::task("Schematic", date(2025, 3, 3), date(2025, 3, 7)))
        .unwrap()
        .id
        .clone();

    let err = board
        .reschedule(&id, date(2025, 3, 10), date(2025, 3, 8))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::InvertedDates { .. })
    ));

    let stored = board.get(&id).unwrap();
    assert_eq!(stored.start, date(2025, 3, 3));
    assert_eq!(stored.end, date(2025, 3, 7));
}

#[test]
fn milestone_reschedule_with_single_date_moves_both_ends() {
    let mut board = board();
    let id = board
        .create_task(TaskInput::milestone("Permit", date(2025, 4, 1)))
        .unwrap()
        .id
        .clone();

    let patch = TaskPatch {
        end: Some(date(2025, 4, 15)),
        ..TaskPatch::default()
    };
    let moved = board.update_task(&id, &patch).unwrap();
    assert_eq!(moved.start, date(2025, 4, 15));
    assert_eq!(moved.end, date(2025, 4, 15));

    let err = board
        .reschedule(&id, date(2025, 4, 15), date(2025, 4, 16))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::MilestoneSpansDays { .. })
    ));
}

#[test]
fn set_progress_validates_range() {
    let mut board = board();
    let id = board
        .create_task(TaskInput::task("Drawings", date(2025, 3, 3), date(2025, 3, 7)))
        .unwrap()
        .id
        .clone();

    assert_eq!(board.set_progress(&id, 0.4).unwrap().progress, 0.4);
    assert!(board.set_progress(&id, 1.5).is_err());
    assert!(board.set_progress(&id, f64::NAN).is_err());
    assert_eq!(board.get(&id).unwrap().progress, 0.4);
}

#[test]
fn stage_color_must_be_hex_triplet() {
    let mut board = board();
    let input = TaskInput::Stage {
        name: "Design".to_string(),
        start: date(2025, 3, 1),
        end: date(2025, 3, 31),
        status: TaskStatus::NotStarted,
        color: Some("blue".to_string()),
        dependencies: Vec::new(),
        sort_key: None,
    };
    assert!(matches!(
        board.create_task(input).unwrap_err(),
        BoardError::Validation(TaskValidationError::InvalidColor(_))
    ));

    let id = board
        .create_task(TaskInput::stage("Design", date(2025, 3, 1), date(2025, 3, 31)))
        .unwrap()
        .id
        .clone();
    let patch = TaskPatch {
        color: Some(Some("#1E88E5".to_string())),
        ..TaskPatch::default()
    };
    assert_eq!(
        board.update_task(&id, &patch).unwrap().color.as_deref(),
        Some("#1E88E5")
    );
}

#[test]
fn parent_stage_must_reference_a_stage() {
    let mut board = board();
    let milestone = board
        .create_task(TaskInput::milestone("Permit", date(2025, 4, 1)))
        .unwrap()
        .id
        .clone();

    let err = board
        .create_task(task_input("Orphan", Some(milestone.as_str()), &[]))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::UnknownStage(_))
    ));
}

#[test]
fn dependencies_must_share_kind_and_stage() {
    let mut board = board();
    let stage_a = board
        .create_task(TaskInput::stage("Concept", date(2025, 3, 1), date(2025, 3, 31)))
        .unwrap()
        .id
        .clone();
    let stage_b = board
        .create_task(TaskInput::stage("Detail", date(2025, 4, 1), date(2025, 4, 30)))
        .unwrap()
        .id
        .clone();
    let first = board
        .create_task(task_input("Massing", Some(stage_a.as_str()), &[]))
        .unwrap()
        .id
        .clone();

    let err = board
        .create_task(task_input("Facade", Some(stage_b.as_str()), &[first.as_str()]))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::DependencyStageMismatch { .. })
    ));

    let err = board
        .create_task(task_input("Mixed", Some(stage_a.as_str()), &[stage_b.as_str()]))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::DependencyKindMismatch {
            expected: TaskKind::Task,
            actual: TaskKind::Stage,
            ..
        })
    ));

    let ok = board
        .create_task(task_input(
            "Plans",
            Some(stage_a.as_str()),
            &[first.as_str(), first.as_str()],
        ))
        .unwrap();
    assert_eq!(ok.dependencies, vec![first]);
}

#[test]
fn dependency_cycles_are_rejected() {
    let mut board = board();
    let a = board
        .create_task(task_input("A", None, &[]))
        .unwrap()
        .id
        .clone();
    let b = board
        .create_task(task_input("B", None, &[a.as_str()]))
        .unwrap()
        .id
        .clone();
    let c = board
        .create_task(task_input("C", None, &[b.as_str()]))
        .unwrap()
        .id
        .clone();

    let patch = TaskPatch {
        dependencies: Some(vec![c.clone()]),
        ..TaskPatch::default()
    };
    let err = board.update_task(&a, &patch).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(TaskValidationError::DependencyCycle { .. })
    ));
    assert!(board.get(&a).unwrap().dependencies.is_empty());

    let self_patch = TaskPatch {
        dependencies: Some(vec![a.clone()]),
        ..TaskPatch::default()
    };
    assert!(matches!(
        board.update_task(&a, &self_patch).unwrap_err(),
        BoardError::Validation(TaskValidationError::SelfDependency(_))
    ));
}

#[test]
fn delete_leaves_dangling_references_that_later_edits_tolerate() {
    let mut board = board();
    let a = board
        .create_task(task_input("A", None, &[]))
        .unwrap()
        .id
        .clone();
    let b = board
        .create_task(task_input("B", None, &[a.as_str()]))
        .unwrap()
        .id
        .clone();

    let removed = board.delete_task(&a).unwrap();
    assert_eq!(removed.id, a);
    assert_eq!(board.get(&b).unwrap().dependencies, vec![a.clone()]);

    let renamed = board
        .update_task(
            &b,
            &TaskPatch {
                name: Some("B revised".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.dependencies, vec![a]);
}

#[test]
fn unknown_ids_report_not_found() {
    let mut board = board();
    assert!(matches!(
        board.delete_task("task_missing"),
        Err(BoardError::NotFound(_))
    ));
    assert!(matches!(
        board.set_progress("task_missing", 0.5),
        Err(BoardError::NotFound(_))
    ));
}

#[test]
fn non_tasks_cannot_carry_stage_relations() {
    let mut board = board();
    let stage = board
        .create_task(TaskInput::stage("Design", date(2025, 3, 1), date(2025, 3, 31)))
        .unwrap()
        .id
        .clone();
    let milestone = board
        .create_task(TaskInput::milestone("Permit", date(2025, 4, 1)))
        .unwrap()
        .id
        .clone();

    let patch = TaskPatch {
        parent_stage_id: Some(Some(stage)),
        ..TaskPatch::default()
    };
    assert!(matches!(
        board.update_task(&milestone, &patch).unwrap_err(),
        BoardError::Validation(TaskValidationError::RelationOnlyForTasks(TaskKind::Milestone))
    ));
}

#[test]
fn create_payload_decodes_by_type_tag() {
    let raw = r##"{"type":"stage","name":"Design","start":"2025-03-01","end":"2025-03-31","color":"#43A047"}"##;
    let input: TaskInput = serde_json::from_str(raw).unwrap();
    assert_eq!(input.kind(), TaskKind::Stage);

    let milestone: TaskInput =
        serde_json::from_str(r#"{"type":"milestone","name":"Permit","date":"2025-04-01"}"#)
            .unwrap();
    assert_eq!(milestone.kind(), TaskKind::Milestone);

    assert!(serde_json::from_str::<TaskInput>(r#"{"type":"epic","name":"x"}"#).is_err());
    assert!(serde_json::from_str::<TaskInput>(r#"{"type":"milestone","name":"x"}"#).is_err());
}
