//! Events emitted by the engine while a transaction runs.

use std::fmt;

/// One notification from the engine's event stream.
///
/// Events arrive in emission order over the channel passed to
/// [`Engine::run_transaction`](crate::Engine::run_transaction) and are
/// forwarded to the observer at the moment of receipt; they are never
/// buffered or retried by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEvent {
    /// A new action began ("Installing htop...").
    ActionStarted {
        /// Description of the action.
        action: String,
    },
    /// Progress on the current action.
    ActionProgress {
        /// Description of the action.
        action: String,
        /// Status detail ("downloading", "1.2 MB/s", ...).
        status: String,
        /// Completion percentage, 0.0..=100.0.
        percent: f64,
    },
    /// Progress of a pre/post-transaction hook script.
    HookProgress {
        /// Description of the hook phase.
        action: String,
        /// The hook being executed.
        details: String,
        /// Status detail.
        status: String,
        /// Completion percentage, 0.0..=100.0.
        percent: f64,
    },
    /// A non-fatal warning.
    Warning {
        /// Warning text.
        message: String,
    },
    /// An error. The transaction may still run to completion for the
    /// remaining operations.
    Error {
        /// Error text.
        message: String,
    },
}

impl TransactionEvent {
    /// True for [`TransactionEvent::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for TransactionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionStarted { action } => write!(f, "{action}"),
            Self::ActionProgress {
                action,
                status,
                percent,
            } => write!(f, "{action} {status} {percent:.0}%"),
            Self::HookProgress {
                action,
                details,
                status,
                ..
            } => write!(f, "{action} {details} {status}"),
            Self::Warning { message } => write!(f, "warning: {message}"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}
