//! Synchronous facade for non-async frontends.
//!
//! [`Session`] owns a current-thread runtime and drives every engine
//! operation to completion before returning, one at a time — the
//! synchronous reshape of the engine's callback protocol. Nothing here is
//! shared across threads; the engine connection is accessed strictly
//! serially by construction.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use upl_engine::{Engine, EngineError, PackageFormat, PackageName, PackageRecord};

use crate::adapter::{FlatpakAdapter, NativeAdapter, SnapAdapter};
use crate::coordinator::{Coordinator, RunState, TransactionOptions, TransactionOutcome};
use crate::detail::{DetailOptions, PackageDetail};
use crate::observer::TransactionObserver;
use crate::select::Direction;

/// Blocking frontend over the three adapters and the coordinator.
pub struct Session<E: Engine + ?Sized> {
    runtime: Runtime,
    native: NativeAdapter<E>,
    snaps: SnapAdapter<E>,
    flatpaks: FlatpakAdapter<E>,
    coordinator: Coordinator<E>,
}

impl<E: Engine + ?Sized> std::fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.coordinator.state())
            .finish_non_exhaustive()
    }
}

impl<E: Engine + ?Sized> Session<E> {
    /// Create a session with a silent observer.
    ///
    /// Constructing the session enables snap and flatpak support on the
    /// engine, as the per-backend plugin wrappers do.
    pub fn new(engine: Arc<E>, options: TransactionOptions) -> std::io::Result<Self> {
        Self::with_observer(engine, options, Arc::new(crate::observer::NullObserver))
    }

    /// Create a session reporting transaction events to `observer`.
    pub fn with_observer(
        engine: Arc<E>,
        options: TransactionOptions,
        observer: Arc<dyn TransactionObserver>,
    ) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            native: NativeAdapter::new(Arc::clone(&engine)),
            snaps: SnapAdapter::new(Arc::clone(&engine)),
            flatpaks: FlatpakAdapter::new(Arc::clone(&engine)),
            coordinator: Coordinator::with_observer(engine, options, observer),
            runtime,
        })
    }

    /// Search one backend. Fail-open, like the async adapters.
    pub fn search(&self, format: PackageFormat, query: &str) -> Vec<PackageRecord> {
        self.runtime.block_on(async {
            match format {
                PackageFormat::Native => self.native.search(query).await,
                PackageFormat::Snap => self.snaps.search(query).await,
                PackageFormat::Flatpak => self.flatpaks.search(query).await,
            }
        })
    }

    /// Everything available in one backend.
    pub fn available(&self, format: PackageFormat) -> Vec<PackageRecord> {
        self.runtime.block_on(async {
            match format {
                PackageFormat::Native => self.native.available().await,
                PackageFormat::Snap => self.snaps.available().await,
                PackageFormat::Flatpak => self.flatpaks.available().await,
            }
        })
    }

    /// Detail for one package.
    ///
    /// The native path surfaces `NotFound`; snap and flatpak details are
    /// fail-open and may come back empty or partial.
    pub fn details(
        &self,
        format: PackageFormat,
        name: &str,
        opts: DetailOptions,
    ) -> Result<PackageDetail, EngineError> {
        self.runtime.block_on(async {
            match format {
                PackageFormat::Native => self.native.details(name, opts).await,
                PackageFormat::Snap => Ok(self.snaps.details(name, opts).await),
                PackageFormat::Flatpak => Ok(self.flatpaks.details(name, opts).await),
            }
        })
    }

    /// Application name for a native package.
    pub fn app_name(&self, name: &str) -> Result<String, EngineError> {
        self.runtime.block_on(self.native.app_name(name))
    }

    /// Installed native package names.
    pub fn installed(&self) -> Result<Vec<PackageName>, EngineError> {
        self.runtime.block_on(self.native.installed())
    }

    /// Filter native install candidates down to existing, not-installed
    /// names.
    pub fn sanitize(&self, names: &[PackageName]) -> Result<Vec<PackageName>, EngineError> {
        self.runtime.block_on(self.native.sanitize(names))
    }

    /// Stage packages for install or removal.
    pub fn mark(&mut self, direction: Direction, format: PackageFormat, names: &[PackageName]) {
        self.coordinator
            .selection_mut()
            .add(direction, format, names.iter().cloned());
    }

    /// Unstage packages. No-op for names not staged.
    pub fn unmark(&mut self, direction: Direction, format: PackageFormat, names: &[PackageName]) {
        self.coordinator
            .selection_mut()
            .remove(direction, format, names.iter().map(PackageName::as_str));
    }

    /// Read access to the staged selection.
    pub fn selection(&self) -> &crate::select::SelectionSet {
        self.coordinator.selection()
    }

    /// Current coordinator state.
    pub fn state(&self) -> RunState {
        self.coordinator.state()
    }

    /// Run one transaction over the staged selection.
    pub fn run(&mut self) -> TransactionOutcome {
        self.runtime.block_on(self.coordinator.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upl_engine::{Catalog, MemoryEngine};

    fn engine() -> Arc<MemoryEngine> {
        Arc::new(MemoryEngine::new(
            Catalog::parse(
                r#"
                repositories = ["core"]

                [[native]]
                name = "htop"
                version = "3.3.0"
                repository = "core"
                "#,
            )
            .unwrap(),
        ))
    }

    #[test]
    fn blocking_search_and_run() {
        let engine = engine();
        let mut session =
            Session::new(Arc::clone(&engine), TransactionOptions::default()).unwrap();

        let hits = session.search(PackageFormat::Native, "htop");
        assert_eq!(hits.len(), 1);

        session.mark(
            Direction::Install,
            PackageFormat::Native,
            &[PackageName::new("htop")],
        );
        let outcome = session.run();
        assert!(outcome.is_success());
        assert!(engine.is_installed(PackageFormat::Native, "htop"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn unmark_is_idempotent() {
        let mut session = Session::new(engine(), TransactionOptions::default()).unwrap();
        let htop = [PackageName::new("htop")];
        session.mark(Direction::Install, PackageFormat::Native, &htop);
        session.unmark(Direction::Install, PackageFormat::Native, &htop);
        session.unmark(Direction::Install, PackageFormat::Native, &htop);
        assert!(session.selection().is_empty());
    }
}
