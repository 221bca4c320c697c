use chrono::{Duration, NaiveDate, NaiveDateTime};
use deskmate_core::model::timestamp::local_now;
use deskmate_core::{Priority, RepoError, Store, TaskManager};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn db_path(dir: &Path) -> PathBuf {
    dir.join("tasks.db")
}

fn manager(dir: &Path) -> TaskManager {
    TaskManager::open(Store::open(db_path(dir)).unwrap()).unwrap()
}

fn tomorrow() -> NaiveDateTime {
    local_now() + Duration::days(1)
}

#[test]
fn create_task_stores_iso_timestamp_and_open_status() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());
    let due = tomorrow();

    let task = tasks.create_task("Test Task", Priority::High, due).unwrap();
    assert_eq!(task.id, 1);
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, due);
    assert!(!task.is_completed);

    let conn = Connection::open(db_path(dir.path())).unwrap();
    let (priority, due_text, completed): (String, String, i64) = conn
        .query_row(
            "SELECT priority, due_date, is_completed FROM tasks WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(priority, "high");
    assert_eq!(
        due_text,
        deskmate_core::model::timestamp::format_timestamp(&due)
    );
    assert_eq!(completed, 0);
}

#[test]
fn get_all_tasks_returns_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());
    let now = local_now();

    tasks
        .create_task("Task 1", Priority::Medium, now + Duration::days(3))
        .unwrap();
    tasks
        .create_task("Task 2", Priority::High, now + Duration::days(1))
        .unwrap();
    tasks
        .create_task("Task 3", Priority::Low, now + Duration::days(2))
        .unwrap();

    let listed = tasks.get_all_tasks().unwrap();
    assert_eq!(listed.len(), 3);
    let priorities: HashSet<_> = listed.iter().map(|task| task.priority).collect();
    assert_eq!(
        priorities,
        HashSet::from([Priority::High, Priority::Medium, Priority::Low])
    );
}

#[test]
fn toggle_twice_restores_status() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());
    let task = tasks
        .create_task("Toggle", Priority::Medium, tomorrow())
        .unwrap();

    tasks.toggle_task_status(task.id).unwrap();
    assert!(tasks.get_all_tasks().unwrap()[0].is_completed);

    tasks.toggle_task_status(task.id).unwrap();
    assert!(!tasks.get_all_tasks().unwrap()[0].is_completed);
}

#[test]
fn toggle_unknown_id_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());
    tasks.toggle_task_status(42).unwrap();
    assert!(tasks.get_all_tasks().unwrap().is_empty());
}

#[test]
fn freed_id_is_reused_first() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());

    let first = tasks.create_task("Task 1", Priority::High, tomorrow()).unwrap();
    let second = tasks
        .create_task("Task 2", Priority::Medium, tomorrow())
        .unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    tasks.delete_task(first.id).unwrap();
    let third = tasks
        .create_task("New Task", Priority::High, tomorrow())
        .unwrap();
    assert_eq!(third.id, 1);
}

#[test]
fn fixed_datetime_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());
    let new_year = NaiveDate::from_ymd_opt(2023, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 0))
        .unwrap();

    let task = tasks.create_task("New Year", Priority::High, new_year).unwrap();

    let conn = Connection::open(db_path(dir.path())).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT due_date FROM tasks WHERE id = ?1",
            params![task.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "2023-12-31T23:59:00");
    assert_eq!(tasks.get_all_tasks().unwrap()[0].due_date, new_year);
}

#[test]
fn task_survives_manager_restart() {
    let dir = tempfile::tempdir().unwrap();
    let created = {
        let first = manager(dir.path());
        let task = first.create_task("Persist", Priority::Low, tomorrow()).unwrap();
        first.toggle_task_status(task.id).unwrap();
        task
    };

    let second = manager(dir.path());
    let loaded = second.get_all_tasks().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, created.id);
    assert_eq!(loaded[0].title, created.title);
    assert_eq!(loaded[0].priority, created.priority);
    assert_eq!(loaded[0].due_date, created.due_date);
    assert!(loaded[0].is_completed);
}

#[test]
fn malformed_stored_timestamp_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());

    let conn = Connection::open(db_path(dir.path())).unwrap();
    conn.execute(
        "INSERT INTO tasks (id, title, priority, due_date) VALUES (1, 'bad', 'high', 'someday')",
        [],
    )
    .unwrap();

    let err = tasks.get_all_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("tasks.due_date")));
}

#[test]
fn unknown_stored_priority_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = manager(dir.path());

    let conn = Connection::open(db_path(dir.path())).unwrap();
    conn.execute(
        "INSERT INTO tasks (id, title, priority, due_date)
         VALUES (1, 'bad', 'urgent', '2024-01-01T00:00:00')",
        [],
    )
    .unwrap();

    assert!(matches!(
        tasks.get_all_tasks().unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn priority_keys_and_labels() {
    assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
    assert!("urgent".parse::<Priority>().is_err());
    for priority in Priority::ALL {
        assert_eq!(priority.as_str().parse::<Priority>().unwrap(), priority);
        assert!(!priority.label().is_empty());
    }

    let json = serde_json::to_value(Priority::Medium).unwrap();
    assert_eq!(json, "medium");
}
