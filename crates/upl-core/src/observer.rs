//! Transaction observer trait for dependency injection.
//!
//! Lets the coordinator report engine events without being coupled to a
//! specific frontend. Every method has a no-op default, so frontends
//! override only what they render.

use std::sync::Arc;

/// Receives engine events as the coordinator forwards them.
///
/// Methods are called at the moment the matching event is received, in
/// engine emission order. `finished` always fires exactly once per run,
/// after teardown.
pub trait TransactionObserver: Send + Sync {
    /// A new action began.
    fn action_started(&self, action: &str) {
        let _ = action;
    }

    /// Progress on the current action.
    fn action_progress(&self, action: &str, status: &str, percent: f64) {
        let _ = (action, status, percent);
    }

    /// Progress of a pre/post-transaction hook script.
    fn hook_progress(&self, action: &str, details: &str, status: &str, percent: f64) {
        let _ = (action, details, status, percent);
    }

    /// A non-fatal warning.
    fn warning(&self, message: &str) {
        let _ = message;
    }

    /// An error surfaced by the engine.
    fn error(&self, message: &str) {
        let _ = message;
    }

    /// The run reached its terminal state.
    fn finished(&self, success: bool) {
        let _ = success;
    }
}

impl<T: TransactionObserver + ?Sized> TransactionObserver for Arc<T> {
    fn action_started(&self, action: &str) {
        (**self).action_started(action);
    }
    fn action_progress(&self, action: &str, status: &str, percent: f64) {
        (**self).action_progress(action, status, percent);
    }
    fn hook_progress(&self, action: &str, details: &str, status: &str, percent: f64) {
        (**self).hook_progress(action, details, status, percent);
    }
    fn warning(&self, message: &str) {
        (**self).warning(message);
    }
    fn error(&self, message: &str) {
        (**self).error(message);
    }
    fn finished(&self, success: bool) {
        (**self).finished(success);
    }
}

/// An observer that ignores everything (silent runs, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TransactionObserver for NullObserver {}

/// An observer that forwards events to the process log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TransactionObserver for LogObserver {
    fn action_started(&self, action: &str) {
        tracing::info!("{action}");
    }
    fn action_progress(&self, action: &str, status: &str, percent: f64) {
        tracing::debug!("{action} {status} {percent:.0}%");
    }
    fn hook_progress(&self, action: &str, details: &str, status: &str, _percent: f64) {
        tracing::debug!("{action} {details} {status}");
    }
    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
    fn finished(&self, success: bool) {
        if success {
            tracing::info!("transaction successful");
        } else {
            tracing::error!("transaction failed");
        }
    }
}
