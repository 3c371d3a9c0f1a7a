//! upl-core - unified package layer over native, snap, and flatpak backends.
//!
//! # Overview
//!
//! Three [backend adapters](adapter) translate per-backend engine calls into
//! one request/result model; the [normalizer](normalize) flattens raw
//! records into display-ready [`PackageDetail`] mappings; the
//! [`SelectionSet`] stages packages marked for install or removal; and the
//! [`Coordinator`] drains the staged set into a single transaction batch
//! against the engine, forwarding engine events to a
//! [`TransactionObserver`] as they occur.
//!
//! # Architecture
//!
//! - **Capability boundary**: all engine access goes through the
//!   `upl_engine::Engine` trait; nothing here touches disks or daemons.
//! - **Fail-open enumeration**: search/list steps log engine errors and
//!   contribute nothing rather than aborting the aggregation.
//! - **Single batch**: mutations accumulate in the selection set and are
//!   submitted together; the engine connection is torn down on every exit
//!   path of a run.

pub mod adapter;
pub mod blocking;
pub mod coordinator;
pub mod detail;
pub mod humanize;
pub mod normalize;
pub mod observer;
pub mod select;

pub use adapter::{FlatpakAdapter, NativeAdapter, SnapAdapter};
pub use coordinator::{Coordinator, RunState, TransactionOptions, TransactionOutcome};
pub use detail::{DetailKey, DetailOptions, DetailValue, PackageDetail};
pub use normalize::normalize;
pub use observer::{LogObserver, NullObserver, TransactionObserver};
pub use select::{Direction, SelectionSet};

// Re-exports from the engine boundary for frontend convenience.
pub use upl_engine::{
    Catalog, Engine, EngineError, MemoryEngine, PackageFormat, PackageName, PackageRecord,
    PackageRef, Settings, TransactionBatch, TransactionEvent,
};
