//! upl-engine - the capability boundary between upl and its package engine.
//!
//! The engine is the external library/daemon that actually resolves
//! dependencies, downloads artifacts, and mutates on-disk package state.
//! This crate models it as the [`Engine`] trait: one async method per
//! capability, a [`TransactionBatch`] for mutations, and a
//! [`TransactionEvent`] stream delivered over a channel while a batch runs.
//!
//! [`MemoryEngine`] is the in-tree reference implementation, seeded from a
//! TOML catalog. It backs the test suite and the `upl` CLI; a daemon-backed
//! engine would implement the same trait by bridging its completion
//! callbacks through one-shot channels.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod memory;
pub mod record;
pub mod types;

pub use config::{Settings, SettingsError};
pub use engine::{BatchOp, Engine, TransactionBatch};
pub use error::EngineError;
pub use event::TransactionEvent;
pub use memory::{Catalog, MemoryEngine};
pub use record::PackageRecord;
pub use types::{PackageFormat, PackageName, PackageRef};
