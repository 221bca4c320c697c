//! Core logic for the Deskmate desktop utilities.
//! Notes, tasks, calendar events, countdown timers and the calculator live
//! here; the graphical shell only calls into this crate.

pub mod calculator;
pub mod config;
pub mod db;
pub mod input;
pub mod logging;
pub mod manager;
pub mod model;
pub mod notify;
pub mod repo;
pub mod timer;

pub use calculator::{evaluate, CalcError, Calculator, Operator};
pub use config::{AppConfig, ConfigError};
pub use db::{DbError, Store};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use manager::calendar::{CalendarError, CalendarManager, DEFAULT_POLL_INTERVAL};
pub use manager::notes::NoteManager;
pub use manager::tasks::TaskManager;
pub use model::event::CalendarEvent;
pub use model::note::Note;
pub use model::task::{Priority, Task};
pub use model::validation::ValidationError;
pub use model::RecordId;
pub use notify::{
    CommandNotifier, ConsoleNotifier, Delivery, LogNotifier, Notification, NotificationCenter,
    Notifier, NotifyError,
};
pub use repo::record_repo::{next_available_id, Record, RecordTable, RepoError, RepoResult};
pub use timer::{ActiveTimer, TimerError, TimerId, TimerScheduler, TIMER_FINISHED_TITLE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
