//! Calendar manager and the due-event poller.
//!
//! # Responsibility
//! - Keep an in-memory mirror of the `events` table, written in parallel
//!   with every store mutation.
//! - Announce each due event once and persist its `notified` flag.
//!
//! # Invariants
//! - The mirror is guarded by one mutex taken by add, delete, list and scan.
//!   Store writes for add/delete happen while it is held, so any event
//!   returned by `get_all_events` is seen by the next scan.
//! - `notified` only flips `false -> true`, and only inside a scan.
//! - The poller wait is interruptible; stopping never waits a full interval.

use crate::db::Store;
use crate::model::event::{CalendarEvent, NewEvent};
use crate::model::timestamp::local_now;
use crate::model::RecordId;
use crate::notify::NotificationCenter;
use crate::repo::event_repo::EventTable;
use crate::repo::record_repo::{RepoError, RepoResult};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const STOP_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum CalendarError {
    Repo(RepoError),
    /// The poller thread could not be started.
    Spawn(std::io::Error),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "failed to start event poller: {err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Spawn(err) => Some(err),
        }
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

struct CalendarShared {
    table: EventTable,
    events: Mutex<Vec<CalendarEvent>>,
    notifications: NotificationCenter,
}

impl CalendarShared {
    fn lock_events(&self) -> MutexGuard<'_, Vec<CalendarEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scan(&self, now: NaiveDateTime) -> Vec<RecordId> {
        let mut events = self.lock_events();
        let mut announced = Vec::new();

        for event in events.iter_mut().filter(|event| event.is_due(now)) {
            let notification = self
                .notifications
                .compose(format!("Event: {}", event.title), event.description.clone());
            let delivery = self.notifications.dispatch(&notification);
            event.notified = true;

            match self.table.mark_notified(event.id) {
                Ok(_) => info!(
                    "event=event_notified module=calendar status=ok id={} delivery={:?}",
                    event.id, delivery
                ),
                Err(err) => warn!(
                    "event=event_notified module=calendar status=error id={} error_code=persist_failed error={}",
                    event.id, err
                ),
            }
            announced.push(event.id);
        }

        announced
    }
}

/// Background loop that scans for due events at a fixed interval.
struct EventPoller {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
    handle: JoinHandle<()>,
}

impl EventPoller {
    fn spawn(shared: Arc<CalendarShared>, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("deskmate-calendar".to_string())
            .spawn(move || {
                loop {
                    shared.scan(local_now());
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                let _ = done_tx.send(());
            })?;

        Ok(Self {
            stop_tx,
            done_rx,
            handle,
        })
    }

    fn stop(self) {
        let _ = self.stop_tx.send(());
        match self.done_rx.recv_timeout(STOP_TIMEOUT) {
            Ok(()) => {
                if self.handle.join().is_err() {
                    warn!("event=poller_stop module=calendar status=error error_code=poller_panicked");
                } else {
                    info!("event=poller_stop module=calendar status=ok");
                }
            }
            Err(_) => {
                // Leave the thread detached; it exits after its current scan.
                warn!("event=poller_stop module=calendar status=error error_code=stop_timeout");
            }
        }
    }
}

/// Calendar events with a shared in-memory mirror and due-event notifications.
pub struct CalendarManager {
    shared: Arc<CalendarShared>,
    poller: Option<EventPoller>,
}

impl CalendarManager {
    /// Loads all events and starts polling every `poll_interval`.
    pub fn open(
        store: Store,
        notifications: NotificationCenter,
        poll_interval: Duration,
    ) -> Result<Self, CalendarError> {
        let mut manager = Self::open_manual(store, notifications)?;
        let poller = EventPoller::spawn(Arc::clone(&manager.shared), poll_interval)
            .map_err(CalendarError::Spawn)?;
        manager.poller = Some(poller);
        info!(
            "event=poller_start module=calendar status=ok interval_ms={}",
            poll_interval.as_millis()
        );
        Ok(manager)
    }

    /// Loads all events without a background poller.
    ///
    /// Due events are only announced by explicit `check_due_events` calls.
    pub fn open_manual(
        store: Store,
        notifications: NotificationCenter,
    ) -> Result<Self, CalendarError> {
        let table = EventTable::open(store)?;
        let events = table.list_all()?;
        info!(
            "event=calendar_load module=calendar status=ok count={}",
            events.len()
        );

        Ok(Self {
            shared: Arc::new(CalendarShared {
                table,
                events: Mutex::new(events),
                notifications,
            }),
            poller: None,
        })
    }

    /// Persists a new event and adds it to the mirror.
    pub fn add_event(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        event_datetime: NaiveDateTime,
    ) -> RepoResult<CalendarEvent> {
        let draft = NewEvent::new(title, description, event_datetime);
        let mut events = self.shared.lock_events();
        let event = self.shared.table.create(&draft)?;
        events.push(event.clone());
        Ok(event)
    }

    /// Deletes an event from the store and the mirror. Unknown IDs are ignored.
    pub fn delete_event(&self, id: RecordId) -> RepoResult<()> {
        let mut events = self.shared.lock_events();
        self.shared.table.delete(id)?;
        events.retain(|event| event.id != id);
        Ok(())
    }

    /// All events, earliest first. Equal date-times are ordered by ID.
    pub fn get_all_events(&self) -> Vec<CalendarEvent> {
        let mut events = self.shared.lock_events().clone();
        events.sort_by(|a, b| {
            a.event_datetime
                .cmp(&b.event_datetime)
                .then_with(|| a.id.cmp(&b.id))
        });
        events
    }

    /// Runs one scan as of `now` and returns the IDs announced by it.
    pub fn check_due_events(&self, now: NaiveDateTime) -> Vec<RecordId> {
        self.shared.scan(now)
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Stops the background poller. Safe to call more than once.
    pub fn stop_notifications(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

impl Drop for CalendarManager {
    fn drop(&mut self) {
        self.stop_notifications();
    }
}
