//! Desktop notification port.
//!
//! # Responsibility
//! - Define the sink contract used by the timer and the calendar poller.
//! - Route failed deliveries to a secondary sink instead of the caller.
//!
//! # Invariants
//! - `NotificationCenter::dispatch` never returns an error and never panics.
//! - Notification text is user content and is never written to the log.

use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_APP_NAME: &str = "Deskmate";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One message for the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub app_name: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum NotifyError {
    /// The platform has no supported notification backend.
    Unsupported,
    Io(std::io::Error),
    /// The backend ran but reported failure.
    Backend(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "desktop notifications are not supported here"),
            Self::Io(err) => write!(f, "notification backend unavailable: {err}"),
            Self::Backend(message) => write!(f, "notification backend failed: {message}"),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NotifyError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Sends notifications through the freedesktop `notify-send` command.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl Default for CommandNotifier {
    fn default() -> Self {
        Self {
            program: "notify-send".to_string(),
        }
    }
}

impl CommandNotifier {
    /// Uses a custom executable with `notify-send` compatible arguments.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !cfg!(unix) || cfg!(target_os = "macos") {
            return Err(NotifyError::Unsupported);
        }

        let output = Command::new(&self.program)
            .arg("--app-name")
            .arg(&notification.app_name)
            .arg("--expire-time")
            .arg(notification.timeout.as_millis().to_string())
            .arg(&notification.title)
            .arg(&notification.message)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::Backend(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Prints notifications to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(
            stdout,
            "Notification: {} - {}",
            notification.title, notification.message
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Records deliveries in the log only (metadata, no text).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        log::info!(
            "event=notification module=notify status=ok sink=log title_chars={} message_chars={}",
            notification.title.chars().count(),
            notification.message.chars().count()
        );
        Ok(())
    }
}

/// Which sink ended up accepting a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Primary,
    Fallback,
    Dropped,
}

/// Primary sink plus a secondary channel for failed deliveries.
#[derive(Clone)]
pub struct NotificationCenter {
    primary: Arc<dyn Notifier>,
    fallback: Arc<dyn Notifier>,
    app_name: String,
    timeout: Duration,
}

impl NotificationCenter {
    pub fn new(primary: Arc<dyn Notifier>, fallback: Arc<dyn Notifier>) -> Self {
        Self {
            primary,
            fallback,
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Desktop sink with console fallback.
    pub fn desktop() -> Self {
        Self::new(Arc::new(CommandNotifier::default()), Arc::new(ConsoleNotifier))
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a notification carrying this center's app name and timeout.
    pub fn compose(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        Notification {
            title: title.into(),
            message: message.into(),
            app_name: self.app_name.clone(),
            timeout: self.timeout,
        }
    }

    /// Delivers through the primary sink, or the fallback when it fails.
    pub fn dispatch(&self, notification: &Notification) -> Delivery {
        let primary_err = match self.primary.notify(notification) {
            Ok(()) => return Delivery::Primary,
            Err(err) => err,
        };
        warn!(
            "event=notification module=notify status=error sink=primary error={}",
            primary_err
        );

        match self.fallback.notify(notification) {
            Ok(()) => Delivery::Fallback,
            Err(err) => {
                error!(
                    "event=notification module=notify status=error sink=fallback error={}",
                    err
                );
                Delivery::Dropped
            }
        }
    }
}
