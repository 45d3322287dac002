//! Error types for Shutter core.

use std::any::Any;
use std::fmt;

/// An error raised by an observer while handling a notification.
///
/// Observers return this from their callback to report that they could not
/// process an event. Panics caught during delivery are converted into
/// [`ObserverError::Panicked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// The observer rejected or failed to process the notification.
    Failed(String),
    /// The observer panicked while processing the notification.
    Panicked(String),
}

impl ObserverError {
    /// Create a [`ObserverError::Failed`] from any displayable message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Build an error from a panic payload captured by `catch_unwind`.
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(msg)
    }

    /// Returns `true` if this error came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "Observer failed: {msg}"),
            Self::Panicked(msg) => write!(f, "Observer panicked: {msg}"),
        }
    }
}

impl std::error::Error for ObserverError {}

/// A single observer failure recorded during delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Position of the failing observer in the delivery order.
    pub position: usize,
    /// The error the observer produced.
    pub error: ObserverError,
}

impl fmt::Display for ObserverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer #{}: {}", self.position, self.error)
    }
}

/// Outcome of delivering one notification to a set of observers.
///
/// Failures are non-fatal: every observer in the snapshot is invoked even if
/// an earlier one failed. Callers inspect the report to surface warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of observers that were invoked.
    pub recipients: usize,
    /// Observers that returned an error or panicked.
    pub failures: Vec<ObserverFailure>,
}

impl DeliveryReport {
    /// A report for a notification that reached nobody.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no observer failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of observers that handled the notification successfully.
    pub fn delivered(&self) -> usize {
        self.recipients - self.failures.len()
    }

    /// Fold another report into this one.
    ///
    /// Failure positions of `other` are offset by this report's recipient
    /// count so they stay unique across the merged delivery.
    pub fn merge(&mut self, other: DeliveryReport) {
        let offset = self.recipients;
        self.recipients += other.recipients;
        self.failures
            .extend(other.failures.into_iter().map(|failure| ObserverFailure {
                position: failure.position + offset,
                error: failure.error,
            }));
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delivered to {}/{} observers",
            self.delivered(),
            self.recipients
        )?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}
