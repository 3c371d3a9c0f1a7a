//! Transaction coordinator.
//!
//! Merges the staged [`SelectionSet`] into a single [`TransactionBatch`],
//! submits it to the engine, and forwards engine events to the observer as
//! they occur. The engine connection is torn down on every exit path.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use upl_engine::{Engine, PackageFormat, TransactionBatch, TransactionEvent};

use crate::observer::{NullObserver, TransactionObserver};
use crate::select::{Direction, SelectionSet};

/// Global options for one coordinator instance. Immutable once set.
#[derive(Debug, Clone)]
pub struct TransactionOptions {
    /// Path to the engine's config file.
    pub config_path: PathBuf,
    /// Simulate the batch without persistent effect.
    pub dry_run: bool,
    /// Upgrade the whole system before installing native packages.
    pub system_update: bool,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/upl/engine.conf"),
            dry_run: false,
            system_update: false,
        }
    }
}

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run started yet.
    Idle,
    /// Assembling the batch from the selection set.
    Configuring,
    /// Batch submitted, engine executing.
    Running,
    /// Terminal: the engine reported success.
    Succeeded,
    /// Terminal: the engine reported failure or errored.
    Failed,
}

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    success: bool,
    events: Vec<TransactionEvent>,
}

impl TransactionOutcome {
    /// Whether the engine reported overall success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Every event, in engine emission order.
    pub fn events(&self) -> &[TransactionEvent] {
        &self.events
    }
}

/// Drains the selection set into one engine transaction.
pub struct Coordinator<E: Engine + ?Sized> {
    engine: Arc<E>,
    options: TransactionOptions,
    selection: SelectionSet,
    observer: Arc<dyn TransactionObserver>,
    state: RunState,
}

impl<E: Engine + ?Sized> std::fmt::Debug for Coordinator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<E: Engine + ?Sized> Coordinator<E> {
    /// Create a coordinator with a silent observer.
    pub fn new(engine: Arc<E>, options: TransactionOptions) -> Self {
        Self::with_observer(engine, options, Arc::new(NullObserver))
    }

    /// Create a coordinator reporting to `observer`.
    pub fn with_observer(
        engine: Arc<E>,
        options: TransactionOptions,
        observer: Arc<dyn TransactionObserver>,
    ) -> Self {
        Self {
            engine,
            options,
            selection: SelectionSet::new(),
            observer,
            state: RunState::Idle,
        }
    }

    /// The options this coordinator was built with.
    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Read access to the staged selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Stage or unstage packages.
    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// Execute one transaction over the staged selection.
    ///
    /// Never fails by signature: engine errors surface through the
    /// forwarded error events and the outcome's success flag. The selection
    /// set is consumed and left empty, the engine connection is shut down,
    /// and the observer's `finished` hook fires on every path.
    pub async fn run(&mut self) -> TransactionOutcome {
        self.state = RunState::Configuring;
        let mut events = Vec::new();

        let batch = match self.configure().await {
            Ok(batch) => batch,
            Err(err) => {
                let message = err.to_string();
                self.observer.error(&message);
                events.push(TransactionEvent::Error { message });
                return self.finish(false, events).await;
            }
        };

        self.state = RunState::Running;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = Arc::clone(&self.engine);
        let run = engine.run_transaction(batch, tx);
        tokio::pin!(run);

        // Forward events the instant they arrive; the biased order keeps
        // event delivery ahead of completion observation.
        let result = loop {
            tokio::select! {
                biased;
                Some(event) = rx.recv() => {
                    self.forward(&event);
                    events.push(event);
                }
                result = &mut run => break result,
            }
        };
        while let Ok(event) = rx.try_recv() {
            self.forward(&event);
            events.push(event);
        }

        let success = match result {
            Ok(success) => success,
            Err(err) => {
                let message = err.to_string();
                self.observer.error(&message);
                events.push(TransactionEvent::Error { message });
                false
            }
        };

        self.finish(success, events).await
    }

    /// Assemble the batch from the staged selection.
    async fn configure(&mut self) -> Result<TransactionBatch, upl_engine::EngineError> {
        let mut batch = TransactionBatch::new();
        batch.set_dry_run(self.options.dry_run);

        let install_native = self
            .selection
            .take_bucket(Direction::Install, PackageFormat::Native);
        let install_snaps = self
            .selection
            .take_bucket(Direction::Install, PackageFormat::Snap);
        let install_flatpaks = self
            .selection
            .take_bucket(Direction::Install, PackageFormat::Flatpak);
        let remove_native = self
            .selection
            .take_bucket(Direction::Remove, PackageFormat::Native);
        let remove_snaps = self
            .selection
            .take_bucket(Direction::Remove, PackageFormat::Snap);
        let remove_flatpaks = self
            .selection
            .take_bucket(Direction::Remove, PackageFormat::Flatpak);

        if !install_native.is_empty() {
            if self.options.system_update {
                // The whole-system upgrade must precede the installs.
                let installed = self.engine.installed_packages().await?;
                batch.add_upgrade_all(installed.into_iter().map(|r| r.name).collect());
            }
            for package in install_native {
                batch.add_install(PackageFormat::Native, package);
            }
        }

        if !install_snaps.is_empty() {
            self.engine.set_enable_snap(true);
            for package in install_snaps {
                batch.add_install(PackageFormat::Snap, package);
            }
        }

        if !install_flatpaks.is_empty() {
            self.engine.set_enable_flatpak(true);
            for package in install_flatpaks {
                batch.add_install(PackageFormat::Flatpak, package);
            }
        }

        for package in remove_native {
            batch.add_remove(PackageFormat::Native, package);
        }

        if !remove_snaps.is_empty() {
            self.engine.set_enable_snap(true);
            for package in remove_snaps {
                batch.add_remove(PackageFormat::Snap, package);
            }
        }

        if !remove_flatpaks.is_empty() {
            self.engine.set_enable_flatpak(true);
            for package in remove_flatpaks {
                batch.add_remove(PackageFormat::Flatpak, package);
            }
        }

        Ok(batch)
    }

    fn forward(&self, event: &TransactionEvent) {
        match event {
            TransactionEvent::ActionStarted { action } => self.observer.action_started(action),
            TransactionEvent::ActionProgress {
                action,
                status,
                percent,
            } => self.observer.action_progress(action, status, *percent),
            TransactionEvent::HookProgress {
                action,
                details,
                status,
                percent,
            } => self
                .observer
                .hook_progress(action, details, status, *percent),
            TransactionEvent::Warning { message } => self.observer.warning(message),
            TransactionEvent::Error { message } => self.observer.error(message),
        }
    }

    /// Terminal transition: teardown, clear, notify.
    async fn finish(
        &mut self,
        success: bool,
        events: Vec<TransactionEvent>,
    ) -> TransactionOutcome {
        self.engine.shutdown().await;
        self.selection.clear();
        self.state = if success {
            RunState::Succeeded
        } else {
            RunState::Failed
        };
        self.observer.finished(success);
        TransactionOutcome { success, events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upl_engine::{Catalog, MemoryEngine};

    #[test]
    fn starts_idle() {
        let engine = Arc::new(MemoryEngine::new(Catalog::default()));
        let coordinator = Coordinator::new(engine, TransactionOptions::default());
        assert_eq!(coordinator.state(), RunState::Idle);
        assert!(coordinator.selection().is_empty());
    }
}
