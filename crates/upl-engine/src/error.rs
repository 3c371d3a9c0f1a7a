//! Error taxonomy for the engine boundary.

use thiserror::Error;

/// Failures crossing the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Generic failure reported by the engine.
    #[error("engine error: {0}")]
    Engine(String),

    /// An expected attribute was absent on a fetched record.
    #[error("missing field on record: {0}")]
    MissingField(String),

    /// A named package does not exist in the engine's view.
    #[error("package not found: {0}")]
    NotFound(String),
}

impl EngineError {
    /// Generic engine failure with a message.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Missing-attribute failure for `field`.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Unknown-package failure for `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}
