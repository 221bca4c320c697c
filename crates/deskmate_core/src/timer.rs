//! One-shot countdown timers that end in a desktop notification.
//!
//! # Responsibility
//! - Keep the registry of pending timers and fire each one once.
//! - Let callers cancel a pending timer and list the remaining ones.
//!
//! # Invariants
//! - Timer IDs start at 1, grow by one and are never reused.
//! - A timer is either pending, fired or cancelled. Fired and cancelled
//!   entries are gone from the registry.
//! - Removal on fire and removal on cancel happen under the same lock, so a
//!   cancelled timer never notifies.
//! - `start_timer` never blocks on delivery; a single worker thread waits
//!   for the earliest deadline.

use crate::model::validation::{require_text, ValidationError};
use crate::notify::NotificationCenter;
use log::{debug, info, warn};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Title used for every finished-timer notification.
pub const TIMER_FINISHED_TITLE: &str = "Timer finished!";

pub type TimerId = u64;

#[derive(Debug)]
pub enum TimerError {
    Validation(ValidationError),
    /// The worker thread could not be started.
    Spawn(std::io::Error),
    /// The scheduler was shut down.
    Stopped,
}

impl Display for TimerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "failed to start timer worker: {err}"),
            Self::Stopped => write!(f, "timer scheduler is stopped"),
        }
    }
}

impl Error for TimerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::Stopped => None,
        }
    }
}

impl From<ValidationError> for TimerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Snapshot of one pending timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTimer {
    pub id: TimerId,
    pub message: String,
    /// Whole seconds until expiry, never negative.
    pub remaining_seconds: u64,
}

struct PendingTimer {
    message: String,
    expires_at: Instant,
}

struct SchedulerState {
    next_id: TimerId,
    pending: HashMap<TimerId, PendingTimer>,
    // Cancelled IDs stay queued and are skipped when they surface.
    deadlines: BinaryHeap<Reverse<(Instant, TimerId)>>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<SchedulerState>,
    wakeup: Condvar,
    notifications: NotificationCenter,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of pending countdowns plus the worker that fires them.
pub struct TimerScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl TimerScheduler {
    /// Starts the worker thread.
    pub fn new(notifications: NotificationCenter) -> Result<Self, TimerError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(SchedulerState {
                next_id: 1,
                pending: HashMap::new(),
                deadlines: BinaryHeap::new(),
                shutdown: false,
            }),
            wakeup: Condvar::new(),
            notifications,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("deskmate-timers".to_string())
            .spawn(move || run_worker(&worker_shared))
            .map_err(TimerError::Spawn)?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Registers a countdown and returns its ID immediately.
    ///
    /// # Errors
    /// - `Validation` when `message` is blank or `duration` cannot be
    ///   represented as a deadline.
    /// - `Stopped` after `shutdown`.
    pub fn start_timer(
        &self,
        duration: Duration,
        message: impl Into<String>,
    ) -> Result<TimerId, TimerError> {
        let message = message.into();
        require_text("message", &message)?;
        let expires_at = Instant::now()
            .checked_add(duration)
            .ok_or(ValidationError::DurationTooLong)?;

        let mut state = self.shared.lock();
        if state.shutdown {
            return Err(TimerError::Stopped);
        }

        let id = state.next_id;
        state.next_id += 1;
        state.pending.insert(
            id,
            PendingTimer {
                message,
                expires_at,
            },
        );
        state.deadlines.push(Reverse((expires_at, id)));
        drop(state);

        self.shared.wakeup.notify_one();
        info!(
            "event=timer_start module=timer status=ok id={} duration_ms={}",
            id,
            duration.as_millis()
        );
        Ok(id)
    }

    /// Cancels a pending timer. Unknown or already fired IDs are a no-op.
    ///
    /// Returns whether a pending timer was removed.
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        let removed = self.shared.lock().pending.remove(&id).is_some();
        if removed {
            info!("event=timer_cancel module=timer status=ok id={id}");
        } else {
            debug!("event=timer_cancel module=timer status=noop id={id}");
        }
        removed
    }

    /// Lists pending timers ordered by ID.
    pub fn get_active_timers(&self) -> Vec<ActiveTimer> {
        let now = Instant::now();
        let state = self.shared.lock();
        let mut timers: Vec<ActiveTimer> = state
            .pending
            .iter()
            .map(|(id, timer)| ActiveTimer {
                id: *id,
                message: timer.message.clone(),
                remaining_seconds: timer.expires_at.saturating_duration_since(now).as_secs(),
            })
            .collect();
        drop(state);

        timers.sort_by_key(|timer| timer.id);
        timers
    }

    /// Stops the worker. Pending timers are dropped without firing.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            state.pending.clear();
            state.deadlines.clear();
        }
        self.shared.wakeup.notify_all();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=timer_shutdown module=timer status=error error_code=worker_panicked");
            }
        }
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(shared: &Shared) {
    let mut state = shared.lock();
    loop {
        if state.shutdown {
            return;
        }

        let now = Instant::now();
        let next = state.deadlines.peek().map(|Reverse(entry)| *entry);
        match next {
            None => {
                state = shared
                    .wakeup
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            Some((deadline, id)) if deadline <= now => {
                state.deadlines.pop();
                let Some(timer) = state.pending.remove(&id) else {
                    continue;
                };
                drop(state);
                fire(shared, id, timer);
                state = shared.lock();
            }
            Some((deadline, _)) => {
                state = shared
                    .wakeup
                    .wait_timeout(state, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        }
    }
}

fn fire(shared: &Shared, id: TimerId, timer: PendingTimer) {
    let notification = shared
        .notifications
        .compose(TIMER_FINISHED_TITLE, timer.message);
    let delivery = shared.notifications.dispatch(&notification);
    info!("event=timer_fired module=timer status=ok id={id} delivery={delivery:?}");
}

#[cfg(test)]
mod tests {
    use super::{TimerError, TimerScheduler};
    use crate::notify::{LogNotifier, NotificationCenter};
    use std::sync::Arc;
    use std::time::Duration;

    fn scheduler() -> TimerScheduler {
        TimerScheduler::new(NotificationCenter::new(
            Arc::new(LogNotifier),
            Arc::new(LogNotifier),
        ))
        .unwrap()
    }

    #[test]
    fn ids_increase_and_are_not_reused_after_cancel() {
        let timers = scheduler();
        let first = timers.start_timer(Duration::from_secs(60), "one").unwrap();
        assert!(timers.cancel_timer(first));
        let second = timers.start_timer(Duration::from_secs(60), "two").unwrap();
        let third = timers.start_timer(Duration::from_secs(60), "three").unwrap();
        assert_eq!((first, second, third), (1, 2, 3));
    }

    #[test]
    fn blank_message_is_rejected_without_consuming_an_id() {
        let timers = scheduler();
        let err = timers.start_timer(Duration::from_secs(1), "   ").unwrap_err();
        assert!(matches!(err, TimerError::Validation(_)));
        assert_eq!(timers.start_timer(Duration::from_secs(60), "ok").unwrap(), 1);
    }

    #[test]
    fn start_after_shutdown_fails() {
        let mut timers = scheduler();
        timers.shutdown();
        let err = timers.start_timer(Duration::from_secs(1), "late").unwrap_err();
        assert!(matches!(err, TimerError::Stopped));
    }
}
