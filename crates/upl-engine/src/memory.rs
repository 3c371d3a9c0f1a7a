//! In-memory reference engine.
//!
//! `MemoryEngine` implements [`Engine`] against a TOML-seeded catalog
//! instead of a system daemon. It backs the test suites and the CLI and
//! doubles as the executable description of the engine contract: enable
//! flags gate snap/flatpak calls, transactions run in batch order, and
//! dry-run batches leave the installed set untouched.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::engine::{BatchOp, Engine, TransactionBatch};
use crate::error::EngineError;
use crate::event::TransactionEvent;
use crate::record::PackageRecord;
use crate::types::{PackageFormat, PackageName};

/// One catalog entry: a record plus its category memberships.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPackage {
    /// The package record as the engine would report it.
    #[serde(flatten)]
    pub record: PackageRecord,
    /// Categories the package is listed under.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Whether the package starts out installed.
    #[serde(default)]
    pub installed: bool,
}

/// A catalog seeding a [`MemoryEngine`].
///
/// ```toml
/// repositories = ["core", "extra"]
/// categories = ["Featured", "Development"]
///
/// [[native]]
/// name = "htop"
/// version = "3.3.0"
/// repository = "extra"
///
/// [[snap]]
/// name = "code"
/// categories = ["Development"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    /// Native repository names, in priority order.
    #[serde(default)]
    pub repositories: Vec<String>,
    /// Category names, including the reserved "Featured" one.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Native packages.
    #[serde(default)]
    pub native: Vec<SeedPackage>,
    /// Snap packages.
    #[serde(default)]
    pub snap: Vec<SeedPackage>,
    /// Flatpak packages.
    #[serde(default)]
    pub flatpak: Vec<SeedPackage>,
}

impl Catalog {
    /// Parse a catalog from TOML text.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::engine(format!("invalid catalog: {e}")))
    }

    /// Load a catalog file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            EngineError::engine(format!(
                "failed to read catalog {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::parse(&text)
    }
}

#[derive(Debug)]
struct Shelf {
    entries: Vec<SeedPackage>,
}

impl Shelf {
    fn new(format: PackageFormat, mut entries: Vec<SeedPackage>) -> Self {
        for entry in &mut entries {
            entry.record.format = format;
        }
        Self { entries }
    }

    fn find(&self, name: &str) -> Option<&SeedPackage> {
        self.entries.iter().find(|e| e.record.name == name)
    }

    fn matching(&self, query: &str) -> impl Iterator<Item = &SeedPackage> {
        let needle = query.to_lowercase();
        self.entries.iter().filter(move |e| {
            let rec = &e.record;
            rec.name.to_lowercase().contains(&needle)
                || rec
                    .app_name
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
                || rec
                    .description
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
    }

    fn in_category(&self, category: &str) -> impl Iterator<Item = &SeedPackage> {
        self.entries
            .iter()
            .filter(move |e| e.categories.iter().any(|c| c == category))
    }
}

/// In-memory [`Engine`] implementation.
pub struct MemoryEngine {
    native: Shelf,
    snaps: Shelf,
    flatpaks: Shelf,
    repositories: Vec<String>,
    categories: Vec<String>,
    installed: Mutex<HashSet<(PackageFormat, PackageName)>>,
    enable_snap: AtomicBool,
    enable_flatpak: AtomicBool,
    last_batch: Mutex<Option<TransactionBatch>>,
    failing_categories: Mutex<HashSet<String>>,
    fail_next_run: Mutex<Option<String>>,
    shut_down: AtomicBool,
}

impl std::fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("repositories", &self.repositories)
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

impl MemoryEngine {
    /// Build an engine from `catalog` with default [`Settings`].
    pub fn new(catalog: Catalog) -> Self {
        Self::with_settings(catalog, &Settings::default())
    }

    /// Build an engine from `catalog`, honoring the plugin flags in
    /// `settings`.
    pub fn with_settings(catalog: Catalog, settings: &Settings) -> Self {
        let mut installed = HashSet::new();
        for (format, entries) in [
            (PackageFormat::Native, &catalog.native),
            (PackageFormat::Snap, &catalog.snap),
            (PackageFormat::Flatpak, &catalog.flatpak),
        ] {
            for entry in entries {
                if entry.installed || entry.record.installed_version.is_some() {
                    installed.insert((format, entry.record.name.clone()));
                }
            }
        }

        Self {
            native: Shelf::new(PackageFormat::Native, catalog.native),
            snaps: Shelf::new(PackageFormat::Snap, catalog.snap),
            flatpaks: Shelf::new(PackageFormat::Flatpak, catalog.flatpak),
            repositories: catalog.repositories,
            categories: catalog.categories,
            installed: Mutex::new(installed),
            enable_snap: AtomicBool::new(settings.enable_snap),
            enable_flatpak: AtomicBool::new(settings.enable_flatpak),
            last_batch: Mutex::new(None),
            failing_categories: Mutex::new(HashSet::new()),
            fail_next_run: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Load a catalog file and build an engine with default settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Ok(Self::new(Catalog::load(path)?))
    }

    /// Make every lookup of `category` fail, to exercise fail-open paths.
    pub fn fail_category(&self, category: impl Into<String>) {
        self.failing_categories
            .lock()
            .expect("lock poisoned")
            .insert(category.into());
    }

    /// Make the next `run_transaction` fail with `message`.
    pub fn fail_next_run(&self, message: impl Into<String>) {
        *self.fail_next_run.lock().expect("lock poisoned") = Some(message.into());
    }

    /// The most recently submitted batch, if any.
    pub fn last_batch(&self) -> Option<TransactionBatch> {
        self.last_batch.lock().expect("lock poisoned").clone()
    }

    /// Whether `name` is currently installed in `format`.
    pub fn is_installed(&self, format: PackageFormat, name: &str) -> bool {
        self.installed
            .lock()
            .expect("lock poisoned")
            .contains(&(format, PackageName::new(name)))
    }

    /// Whether [`Engine::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn shelf(&self, format: PackageFormat) -> &Shelf {
        match format {
            PackageFormat::Native => &self.native,
            PackageFormat::Snap => &self.snaps,
            PackageFormat::Flatpak => &self.flatpaks,
        }
    }

    /// Clone an entry's record, reflecting the current installed state.
    fn materialize(&self, entry: &SeedPackage) -> PackageRecord {
        let mut record = entry.record.clone();
        let key = (record.format, record.name.clone());
        if self.installed.lock().expect("lock poisoned").contains(&key) {
            if record.installed_version.is_none() {
                record.installed_version = record.version.clone();
            }
        } else {
            record.installed_version = None;
        }
        record
    }

    fn check_category(&self, category: &str) -> Result<(), EngineError> {
        if self
            .failing_categories
            .lock()
            .expect("lock poisoned")
            .contains(category)
        {
            Err(EngineError::engine(format!(
                "category unavailable: {category}"
            )))
        } else {
            Ok(())
        }
    }

    fn check_snap_enabled(&self) -> Result<(), EngineError> {
        if self.enable_snap.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EngineError::engine("snap support is disabled"))
        }
    }

    fn check_flatpak_enabled(&self) -> Result<(), EngineError> {
        if self.enable_flatpak.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EngineError::engine("flatpak support is disabled"))
        }
    }

    fn apply(
        &self,
        batch: &TransactionBatch,
        events: &mpsc::UnboundedSender<TransactionEvent>,
    ) -> bool {
        let mut ok = true;

        for op in batch.ops() {
            match op {
                BatchOp::UpgradeAll { packages } => {
                    let _ = events.send(TransactionEvent::ActionStarted {
                        action: format!("Upgrading {} packages", packages.len()),
                    });
                    let _ = events.send(TransactionEvent::ActionProgress {
                        action: "Upgrading".to_string(),
                        status: "done".to_string(),
                        percent: 100.0,
                    });
                }
                BatchOp::Install { format, package } => {
                    let _ = events.send(TransactionEvent::ActionStarted {
                        action: format!("Installing {package}"),
                    });
                    if self.shelf(*format).find(package).is_none() {
                        let _ = events.send(TransactionEvent::Error {
                            message: format!("target not found: {package}"),
                        });
                        ok = false;
                        continue;
                    }
                    let _ = events.send(TransactionEvent::ActionProgress {
                        action: format!("Installing {package}"),
                        status: "done".to_string(),
                        percent: 100.0,
                    });
                    if !batch.dry_run() {
                        self.installed
                            .lock()
                            .expect("lock poisoned")
                            .insert((*format, package.clone()));
                    }
                }
                BatchOp::Remove { format, package } => {
                    let key = (*format, package.clone());
                    let present = self
                        .installed
                        .lock()
                        .expect("lock poisoned")
                        .contains(&key);
                    if !present {
                        let _ = events.send(TransactionEvent::Warning {
                            message: format!("{package} is not installed"),
                        });
                        continue;
                    }
                    let _ = events.send(TransactionEvent::ActionStarted {
                        action: format!("Removing {package}"),
                    });
                    let _ = events.send(TransactionEvent::ActionProgress {
                        action: format!("Removing {package}"),
                        status: "done".to_string(),
                        percent: 100.0,
                    });
                    if !batch.dry_run() {
                        self.installed.lock().expect("lock poisoned").remove(&key);
                    }
                }
            }
        }

        ok
    }
}

#[async_trait]
impl Engine for MemoryEngine {
    async fn search_native(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError> {
        Ok(self
            .native
            .matching(query)
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn search_snaps(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError> {
        self.check_snap_enabled()?;
        Ok(self
            .snaps
            .matching(query)
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn search_flatpaks(&self, query: &str) -> Result<Vec<PackageRecord>, EngineError> {
        self.check_flatpak_enabled()?;
        Ok(self
            .flatpaks
            .matching(query)
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn package(&self, name: &str) -> Result<Option<PackageRecord>, EngineError> {
        Ok(self.native.find(name).map(|e| self.materialize(e)))
    }

    async fn snap(&self, name: &str) -> Result<PackageRecord, EngineError> {
        self.check_snap_enabled()?;
        self.snaps
            .find(name)
            .map(|e| self.materialize(e))
            .ok_or_else(|| EngineError::not_found(name))
    }

    async fn flatpak(&self, name: &str) -> Result<PackageRecord, EngineError> {
        self.check_flatpak_enabled()?;
        self.flatpaks
            .find(name)
            .map(|e| self.materialize(e))
            .ok_or_else(|| EngineError::not_found(name))
    }

    async fn category_names(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.categories.clone())
    }

    async fn repository_names(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.repositories.clone())
    }

    async fn repository_packages(&self, repo: &str) -> Result<Vec<PackageRecord>, EngineError> {
        Ok(self
            .native
            .entries
            .iter()
            .filter(|e| e.record.repository.as_deref() == Some(repo))
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn category_snaps(&self, category: &str) -> Result<Vec<PackageRecord>, EngineError> {
        self.check_snap_enabled()?;
        self.check_category(category)?;
        Ok(self
            .snaps
            .in_category(category)
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn category_flatpaks(&self, category: &str) -> Result<Vec<PackageRecord>, EngineError> {
        self.check_flatpak_enabled()?;
        self.check_category(category)?;
        Ok(self
            .flatpaks
            .in_category(category)
            .map(|e| self.materialize(e))
            .collect())
    }

    async fn installed_packages(&self) -> Result<Vec<PackageRecord>, EngineError> {
        Ok(self
            .native
            .entries
            .iter()
            .filter(|e| {
                self.installed
                    .lock()
                    .expect("lock poisoned")
                    .contains(&(PackageFormat::Native, e.record.name.clone()))
            })
            .map(|e| self.materialize(e))
            .collect())
    }

    fn support_snap(&self) -> bool {
        self.enable_snap.load(Ordering::SeqCst)
    }

    fn support_flatpak(&self) -> bool {
        self.enable_flatpak.load(Ordering::SeqCst)
    }

    fn set_enable_snap(&self, enable: bool) {
        self.enable_snap.store(enable, Ordering::SeqCst);
    }

    fn set_enable_flatpak(&self, enable: bool) {
        self.enable_flatpak.store(enable, Ordering::SeqCst);
    }

    async fn run_transaction(
        &self,
        batch: TransactionBatch,
        events: mpsc::UnboundedSender<TransactionEvent>,
    ) -> Result<bool, EngineError> {
        tracing::debug!("running transaction with {} operations", batch.len());
        *self.last_batch.lock().expect("lock poisoned") = Some(batch.clone());

        if let Some(message) = self.fail_next_run.lock().expect("lock poisoned").take() {
            return Err(EngineError::engine(message));
        }

        Ok(self.apply(&batch, &events))
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}
