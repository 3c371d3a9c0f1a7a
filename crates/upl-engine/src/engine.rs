//! The `Engine` trait and transaction batch model.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::event::TransactionEvent;
use crate::record::PackageRecord;
use crate::types::{PackageFormat, PackageName};

/// One operation inside a transaction batch.
///
/// Operations execute in batch order; an `UpgradeAll` enqueued before the
/// install ops upgrades the running system first.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Upgrade every listed (currently installed) native package.
    UpgradeAll {
        /// The installed packages to bring up to date.
        packages: Vec<PackageName>,
    },
    /// Install one package.
    Install {
        /// Backend the package belongs to.
        format: PackageFormat,
        /// Package to install.
        package: PackageName,
    },
    /// Remove one package.
    Remove {
        /// Backend the package belongs to.
        format: PackageFormat,
        /// Package to remove.
        package: PackageName,
    },
}

/// The set of install/remove operations submitted together in one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionBatch {
    dry_run: bool,
    ops: Vec<BatchOp>,
}

impl TransactionBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the batch without persistent effect.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    /// Whether the batch is a simulation.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Enqueue an upgrade of all listed packages.
    pub fn add_upgrade_all(&mut self, packages: Vec<PackageName>) {
        self.ops.push(BatchOp::UpgradeAll { packages });
    }

    /// Enqueue one install.
    pub fn add_install(&mut self, format: PackageFormat, package: PackageName) {
        self.ops.push(BatchOp::Install { format, package });
    }

    /// Enqueue one removal.
    pub fn add_remove(&mut self, format: PackageFormat, package: PackageName) {
        self.ops.push(BatchOp::Remove { format, package });
    }

    /// Operations in submission order.
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// True when no operations are enqueued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of enqueued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Capability boundary to the external package engine.
///
/// Every method is one engine call. Implementations bridge whatever
/// completion-callback protocol the real engine speaks into these futures —
/// one one-shot channel per request, never a shared loop — so concurrent
/// calls from different tasks stay safe even though upl itself only ever
/// issues them serially.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Search native packages matching `query`.
    async fn search_native(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Search the snap store for `query`.
    async fn search_snaps(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Search flatpak remotes for `query`.
    async fn search_flatpaks(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Look up one native package by name. `None` when unknown.
    async fn package(&self, name: &str) -> Result<Option<PackageRecord>, EngineError>;

    /// Fetch one snap record by name.
    async fn snap(&self, name: &str) -> Result<PackageRecord, EngineError>;

    /// Fetch one flatpak record by name.
    async fn flatpak(&self, name: &str) -> Result<PackageRecord, EngineError>;

    /// Names of the engine's package categories.
    async fn category_names(&self) -> Result<Vec<String>, EngineError>;

    /// Names of the configured native repositories.
    async fn repository_names(&self) -> Result<Vec<String>, EngineError>;

    /// Every package in the native repository `repo`.
    async fn repository_packages(&self, repo: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Snaps in `category`.
    async fn category_snaps(&self, category: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Flatpaks in `category`.
    async fn category_flatpaks(&self, category: &str) -> Result<Vec<PackageRecord>, EngineError>;

    /// Every installed native package.
    async fn installed_packages(&self) -> Result<Vec<PackageRecord>, EngineError>;

    /// Whether snap support is currently enabled.
    fn support_snap(&self) -> bool;

    /// Whether flatpak support is currently enabled.
    fn support_flatpak(&self) -> bool;

    /// Enable or disable snap support on the shared configuration.
    fn set_enable_snap(&self, enable: bool);

    /// Enable or disable flatpak support on the shared configuration.
    fn set_enable_flatpak(&self, enable: bool);

    /// Execute `batch`, emitting [`TransactionEvent`]s through `events` as
    /// they occur.
    ///
    /// Returns `Ok(true)` when every operation succeeded, `Ok(false)` when
    /// the batch completed with per-operation errors, and `Err` when the
    /// engine itself failed. An empty batch is a valid no-op run.
    async fn run_transaction(
        &self,
        batch: TransactionBatch,
        events: mpsc::UnboundedSender<TransactionEvent>,
    ) -> Result<bool, EngineError>;

    /// Tear down the backing daemon connection. Idempotent.
    async fn shutdown(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preserves_submission_order() {
        let mut batch = TransactionBatch::new();
        batch.add_upgrade_all(vec!["bash".into()]);
        batch.add_install(PackageFormat::Native, "htop".into());
        batch.add_remove(PackageFormat::Snap, "spotify".into());

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], BatchOp::UpgradeAll { .. }));
        assert!(matches!(
            batch.ops()[1],
            BatchOp::Install {
                format: PackageFormat::Native,
                ..
            }
        ));
        assert!(matches!(
            batch.ops()[2],
            BatchOp::Remove {
                format: PackageFormat::Snap,
                ..
            }
        ));
    }

    #[test]
    fn empty_batch_is_valid() {
        let batch = TransactionBatch::new();
        assert!(batch.is_empty());
        assert!(!batch.dry_run());
    }
}
