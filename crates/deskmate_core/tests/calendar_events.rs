use chrono::Duration as ChronoDuration;
use deskmate_core::model::timestamp::local_now;
use deskmate_core::{
    CalendarManager, Notification, NotificationCenter, Notifier, NotifyError, Store,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Unsupported);
        }
        self.seen.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn db_path(dir: &Path) -> PathBuf {
    dir.join("calendar.db")
}

fn center(primary: &Arc<RecordingNotifier>, fallback: &Arc<RecordingNotifier>) -> NotificationCenter {
    NotificationCenter::new(primary.clone(), fallback.clone())
}

fn manual_manager(dir: &Path, primary: &Arc<RecordingNotifier>) -> CalendarManager {
    let fallback = Arc::new(RecordingNotifier::default());
    CalendarManager::open_manual(Store::open(db_path(dir)).unwrap(), center(primary, &fallback))
        .unwrap()
}

fn notified_flag(dir: &Path, id: i64) -> i64 {
    let conn = Connection::open(db_path(dir)).unwrap();
    conn.query_row("SELECT notified FROM events WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn add_event_persists_row_and_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);
    let when = local_now() + ChronoDuration::days(1);

    let event = calendar.add_event("Test Event", "Description", when).unwrap();
    assert_eq!(event.id, 1);
    assert_eq!(event.event_datetime, when);
    assert!(!event.notified);
    assert_eq!(calendar.get_all_events(), vec![event]);
    assert_eq!(notified_flag(dir.path(), 1), 0);
}

#[test]
fn delete_event_removes_row_and_mirror_entry() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);

    let event = calendar
        .add_event("Gone", "soon", local_now() + ChronoDuration::days(1))
        .unwrap();
    calendar.delete_event(event.id).unwrap();
    calendar.delete_event(999).unwrap();

    assert!(calendar.get_all_events().is_empty());
    let conn = Connection::open(db_path(dir.path())).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn events_are_sorted_by_datetime() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);
    let now = local_now();

    let in_three = calendar
        .add_event("Event 3", "Desc 3", now + ChronoDuration::days(3))
        .unwrap();
    let in_one = calendar
        .add_event("Event 1", "Desc 1", now + ChronoDuration::days(1))
        .unwrap();
    let in_two = calendar
        .add_event("Event 2", "Desc 2", now + ChronoDuration::days(2))
        .unwrap();

    let ids: Vec<_> = calendar.get_all_events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![in_one.id, in_two.id, in_three.id]);
}

#[test]
fn equal_datetimes_are_ordered_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);
    let when = local_now() + ChronoDuration::hours(2);

    calendar.add_event("a", "", when).unwrap();
    calendar.add_event("b", "", when).unwrap();
    calendar.add_event("c", "", when).unwrap();
    calendar.delete_event(1).unwrap();
    calendar.add_event("d", "", when).unwrap();

    let ids: Vec<_> = calendar.get_all_events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn freed_id_is_reused_first() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);
    let later = local_now() + ChronoDuration::days(1);

    let first = calendar.add_event("Event 1", "Desc 1", later).unwrap();
    let second = calendar.add_event("Event 2", "Desc 2", later).unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    calendar.delete_event(first.id).unwrap();
    assert_eq!(calendar.add_event("Event 3", "Desc 3", later).unwrap().id, 1);
}

#[test]
fn due_event_is_announced_once_and_flag_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let calendar = manual_manager(dir.path(), &primary);
    let now = local_now();

    let due = calendar
        .add_event("Standup", "daily sync", now - ChronoDuration::minutes(1))
        .unwrap();
    let future = calendar
        .add_event("Review", "later", now + ChronoDuration::days(1))
        .unwrap();

    assert_eq!(calendar.check_due_events(now), vec![due.id]);
    assert_eq!(calendar.check_due_events(now), Vec::<i64>::new());

    assert_eq!(primary.titles(), vec!["Event: Standup".to_string()]);
    assert_eq!(notified_flag(dir.path(), due.id), 1);
    assert_eq!(notified_flag(dir.path(), future.id), 0);

    let events = calendar.get_all_events();
    assert!(events.iter().find(|e| e.id == due.id).unwrap().notified);
}

#[test]
fn notified_flag_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let now = local_now();
    {
        let calendar = manual_manager(dir.path(), &primary);
        calendar
            .add_event("Past", "done", now - ChronoDuration::hours(1))
            .unwrap();
        calendar.check_due_events(now);
    }

    let reopened = manual_manager(dir.path(), &primary);
    assert!(reopened.get_all_events()[0].notified);
    assert!(reopened.check_due_events(now).is_empty());
    assert_eq!(primary.titles().len(), 1);
}

#[test]
fn timestamps_round_trip_through_a_fresh_manager() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let when = local_now() + ChronoDuration::days(5);
    {
        let calendar = manual_manager(dir.path(), &primary);
        calendar.add_event("Trip", "pack", when).unwrap();
    }

    let reopened = manual_manager(dir.path(), &primary);
    assert_eq!(reopened.get_all_events()[0].event_datetime, when);
}

#[test]
fn failed_delivery_still_marks_notified_and_uses_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::failing());
    let fallback = Arc::new(RecordingNotifier::default());
    let calendar = CalendarManager::open_manual(
        Store::open(db_path(dir.path())).unwrap(),
        center(&primary, &fallback),
    )
    .unwrap();
    let now = local_now();

    let event = calendar
        .add_event("Dentist", "bring card", now - ChronoDuration::seconds(5))
        .unwrap();
    assert_eq!(calendar.check_due_events(now), vec![event.id]);
    assert!(calendar.check_due_events(now).is_empty());

    assert_eq!(fallback.titles(), vec!["Event: Dentist".to_string()]);
    assert_eq!(notified_flag(dir.path(), event.id), 1);
}

#[test]
fn background_poller_announces_new_event_once() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let fallback = Arc::new(RecordingNotifier::default());
    let mut calendar = CalendarManager::open(
        Store::open(db_path(dir.path())).unwrap(),
        center(&primary, &fallback),
        Duration::from_millis(20),
    )
    .unwrap();
    assert!(calendar.is_polling());

    calendar
        .add_event("Now", "right away", local_now() - ChronoDuration::seconds(1))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while primary.titles().is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    // Several more scan cycles must not repeat the notification.
    std::thread::sleep(Duration::from_millis(100));

    assert_eq!(primary.titles(), vec!["Event: Now".to_string()]);

    let started = Instant::now();
    calendar.stop_notifications();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!calendar.is_polling());
    calendar.stop_notifications();
}

#[test]
fn stop_does_not_wait_for_a_full_interval() {
    let dir = tempfile::tempdir().unwrap();
    let primary = Arc::new(RecordingNotifier::default());
    let fallback = Arc::new(RecordingNotifier::default());
    let mut calendar = CalendarManager::open(
        Store::open(db_path(dir.path())).unwrap(),
        center(&primary, &fallback),
        Duration::from_secs(30),
    )
    .unwrap();

    let started = Instant::now();
    calendar.stop_notifications();
    assert!(started.elapsed() < Duration::from_secs(2));
}
