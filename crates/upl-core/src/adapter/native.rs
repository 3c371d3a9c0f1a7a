//! Native package adapter.

use std::collections::HashSet;
use std::sync::Arc;

use upl_engine::{Engine, EngineError, PackageName, PackageRecord};

use crate::detail::{DetailOptions, PackageDetail};
use crate::normalize::normalize;

use super::extend_unique;

/// Search, listing, and detail lookup for native distro packages.
#[derive(Debug, Clone)]
pub struct NativeAdapter<E: Engine + ?Sized> {
    engine: Arc<E>,
}

impl<E: Engine + ?Sized> NativeAdapter<E> {
    /// Wrap `engine`.
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Search native packages matching `query`.
    ///
    /// Fail-open: an engine error yields no results.
    pub async fn search(&self, query: &str) -> Vec<PackageRecord> {
        match self.engine.search_native(query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("native search failed: {err}");
                Vec::new()
            }
        }
    }

    /// Every available native package, one round-trip per repository.
    pub async fn available(&self) -> Vec<PackageRecord> {
        let mut acc = Vec::new();
        self.available_into(&mut acc).await;
        acc
    }

    /// Accumulate available packages into `acc`, deduplicating by name
    /// against what the caller already collected.
    ///
    /// A failing repository is logged and skipped; the rest still
    /// aggregate.
    pub async fn available_into(&self, acc: &mut Vec<PackageRecord>) {
        let repos = match self.engine.repository_names().await {
            Ok(repos) => repos,
            Err(err) => {
                tracing::warn!("listing repositories failed: {err}");
                return;
            }
        };

        for repo in repos {
            match self.engine.repository_packages(&repo).await {
                Ok(records) => extend_unique(acc, records),
                Err(err) => {
                    tracing::warn!("repository {repo} skipped: {err}");
                }
            }
        }
    }

    /// Full detail for `name`.
    ///
    /// Unlike the enumeration paths this surfaces `NotFound`: asking for
    /// details of a package the engine does not know is a caller error.
    pub async fn details(
        &self,
        name: &str,
        opts: DetailOptions,
    ) -> Result<PackageDetail, EngineError> {
        let record = self
            .engine
            .package(name)
            .await?
            .ok_or_else(|| EngineError::not_found(name))?;
        Ok(normalize(&record, opts))
    }

    /// Application name for `name`, falling back to the package name.
    pub async fn app_name(&self, name: &str) -> Result<String, EngineError> {
        let record = self
            .engine
            .package(name)
            .await?
            .ok_or_else(|| EngineError::not_found(name))?;
        Ok(record.display_name().to_string())
    }

    /// Names of every installed native package.
    pub async fn installed(&self) -> Result<Vec<PackageName>, EngineError> {
        Ok(self
            .engine
            .installed_packages()
            .await?
            .into_iter()
            .map(|record| record.name)
            .collect())
    }

    /// Keep only names that exist in the engine's view and are not already
    /// installed.
    ///
    /// Rejected names are logged and dropped; the survivors are install
    /// candidates.
    pub async fn sanitize(&self, names: &[PackageName]) -> Result<Vec<PackageName>, EngineError> {
        let installed: HashSet<PackageName> = self.installed().await?.into_iter().collect();
        let mut kept = Vec::new();

        for name in names {
            let known = self
                .engine
                .package(name)
                .await?
                .is_some_and(|record| record.name == *name);
            if !known {
                tracing::warn!("{}", EngineError::not_found(name.as_str()));
                continue;
            }
            if installed.contains(name) {
                tracing::warn!("{name} is already installed, dropped from candidates");
                continue;
            }
            kept.push(name.clone());
        }

        Ok(kept)
    }
}
