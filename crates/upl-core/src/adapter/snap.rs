//! Snap package adapter.

use std::sync::Arc;

use upl_engine::{Engine, PackageRecord};

use crate::detail::{DetailOptions, PackageDetail};
use crate::normalize::normalize;

use super::{FEATURED_CATEGORY, extend_unique};

/// Search, listing, and detail lookup for snap packages.
///
/// Constructing the adapter enables snap support on the engine's shared
/// configuration, mirroring how the plugin wrappers behave.
#[derive(Debug, Clone)]
pub struct SnapAdapter<E: Engine + ?Sized> {
    engine: Arc<E>,
}

impl<E: Engine + ?Sized> SnapAdapter<E> {
    /// Wrap `engine`, enabling snap support.
    pub fn new(engine: Arc<E>) -> Self {
        engine.set_enable_snap(true);
        Self { engine }
    }

    /// Whether the engine's snap plugin is available.
    pub fn plugin_installed(&self) -> bool {
        self.engine.support_snap()
    }

    /// Search the snap store for `query`. Fail-open.
    pub async fn search(&self, query: &str) -> Vec<PackageRecord> {
        match self.engine.search_snaps(query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("snap search failed: {err}");
                Vec::new()
            }
        }
    }

    /// Every known snap, enumerated category by category.
    pub async fn available(&self) -> Vec<PackageRecord> {
        let mut acc = Vec::new();
        self.available_into(&mut acc).await;
        acc
    }

    /// Accumulate available snaps into `acc`, deduplicating by name.
    ///
    /// The reserved "Featured" category is never used as a source. One
    /// round-trip per category; a failing category is logged and skipped.
    pub async fn available_into(&self, acc: &mut Vec<PackageRecord>) {
        let categories = match self.engine.category_names().await {
            Ok(categories) => categories,
            Err(err) => {
                tracing::warn!("listing categories failed: {err}");
                return;
            }
        };

        for category in categories {
            if category == FEATURED_CATEGORY {
                continue;
            }
            match self.engine.category_snaps(&category).await {
                Ok(records) => extend_unique(acc, records),
                Err(err) => {
                    tracing::warn!("category {category} skipped: {err}");
                }
            }
        }
    }

    /// Detail for the snap `name`.
    ///
    /// Fail-open: an engine failure is logged and yields an empty detail.
    /// A record missing expected store attributes is logged and yields a
    /// partial detail — a signaled, non-fatal condition.
    pub async fn details(&self, name: &str, opts: DetailOptions) -> PackageDetail {
        match self.engine.snap(name).await {
            Ok(record) => {
                for field in record.missing_snap_fields() {
                    tracing::warn!(
                        "snap {name}: {}",
                        upl_engine::EngineError::missing_field(field)
                    );
                }
                normalize(&record, opts)
            }
            Err(err) => {
                tracing::warn!("snap detail for {name} failed: {err}");
                PackageDetail::empty(upl_engine::PackageFormat::Snap)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailKey;
    use upl_engine::{Catalog, MemoryEngine};

    fn engine() -> Arc<MemoryEngine> {
        Arc::new(MemoryEngine::new(
            Catalog::parse(
                r#"
                categories = ["Featured", "Development", "Music", "Games"]

                [[snap]]
                name = "code"
                version = "1.92"
                channel = "stable"
                publisher = "vscode"
                confined = "classic"
                categories = ["Development", "Featured"]

                [[snap]]
                name = "spotify"
                version = "1.2"
                categories = ["Music"]

                [[snap]]
                name = "featured-only"
                version = "1.0"
                categories = ["Featured"]
                "#,
            )
            .unwrap(),
        ))
    }

    #[tokio::test]
    async fn constructor_enables_snap_support() {
        let engine = engine();
        assert!(!engine.support_snap());
        let adapter = SnapAdapter::new(Arc::clone(&engine));
        assert!(adapter.plugin_installed());
    }

    #[tokio::test]
    async fn available_skips_featured_and_dedups() {
        let adapter = SnapAdapter::new(engine());
        let names: Vec<_> = adapter
            .available()
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        // "featured-only" lives solely in the reserved category, so it
        // never appears; "code" appears once despite two memberships.
        assert_eq!(names, vec!["code", "spotify"]);
    }

    #[tokio::test]
    async fn failing_category_does_not_abort_enumeration() {
        let engine = engine();
        engine.fail_category("Development");
        let adapter = SnapAdapter::new(Arc::clone(&engine));
        let names: Vec<_> = adapter
            .available()
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["spotify"]);
    }

    #[tokio::test]
    async fn accumulator_is_caller_suppliable() {
        let adapter = SnapAdapter::new(engine());
        let mut acc = vec![PackageRecord::new("code", upl_engine::PackageFormat::Snap)];
        adapter.available_into(&mut acc).await;
        let names: Vec<_> = acc.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["code", "spotify"]);
    }

    #[tokio::test]
    async fn missing_store_fields_leave_detail_partial() {
        let adapter = SnapAdapter::new(engine());
        // "spotify" is seeded without channel/publisher/confined.
        let detail = adapter.details("spotify", DetailOptions::default()).await;
        assert!(detail.get(DetailKey::Channel).is_none());
        assert!(detail.get(DetailKey::Name).is_some());
    }

    #[tokio::test]
    async fn unknown_snap_yields_empty_detail() {
        let adapter = SnapAdapter::new(engine());
        let detail = adapter.details("missing", DetailOptions::default()).await;
        assert!(detail.is_empty());
    }
}
