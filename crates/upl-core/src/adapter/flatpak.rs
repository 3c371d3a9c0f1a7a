//! Flatpak package adapter.

use std::sync::Arc;

use upl_engine::{Engine, PackageFormat, PackageRecord};

use crate::detail::{DetailOptions, PackageDetail};
use crate::normalize::normalize;

use super::{FEATURED_CATEGORY, extend_unique};

/// Search, listing, and detail lookup for flatpak applications.
///
/// Constructing the adapter enables flatpak support on the engine's shared
/// configuration.
#[derive(Debug, Clone)]
pub struct FlatpakAdapter<E: Engine + ?Sized> {
    engine: Arc<E>,
}

impl<E: Engine + ?Sized> FlatpakAdapter<E> {
    /// Wrap `engine`, enabling flatpak support.
    pub fn new(engine: Arc<E>) -> Self {
        engine.set_enable_flatpak(true);
        Self { engine }
    }

    /// Whether the engine's flatpak plugin is available.
    pub fn plugin_installed(&self) -> bool {
        self.engine.support_flatpak()
    }

    /// Search flatpak remotes for `query`. Fail-open.
    pub async fn search(&self, query: &str) -> Vec<PackageRecord> {
        match self.engine.search_flatpaks(query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("flatpak search failed: {err}");
                Vec::new()
            }
        }
    }

    /// Every known flatpak, enumerated category by category.
    pub async fn available(&self) -> Vec<PackageRecord> {
        let mut acc = Vec::new();
        self.available_into(&mut acc).await;
        acc
    }

    /// Accumulate available flatpaks into `acc`, deduplicating by name,
    /// skipping the reserved "Featured" category, fail-open per category.
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
            match self.engine.category_flatpaks(&category).await {
                Ok(records) => extend_unique(acc, records),
                Err(err) => {
                    tracing::warn!("category {category} skipped: {err}");
                }
            }
        }
    }

    /// Detail for the flatpak `name`. Fail-open like the snap path.
    pub async fn details(&self, name: &str, opts: DetailOptions) -> PackageDetail {
        match self.engine.flatpak(name).await {
            Ok(record) => normalize(&record, opts),
            Err(err) => {
                tracing::warn!("flatpak detail for {name} failed: {err}");
                PackageDetail::empty(PackageFormat::Flatpak)
            }
        }
    }

    /// Normalize a record already in hand, without another engine call.
    pub fn normalize_record(&self, record: &PackageRecord, opts: DetailOptions) -> PackageDetail {
        normalize(record, opts)
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
                categories = ["Featured", "Graphics", "Internet"]

                [[flatpak]]
                name = "org.gimp.GIMP"
                app_name = "GIMP"
                version = "2.10"
                categories = ["Graphics"]

                [[flatpak]]
                name = "org.mozilla.firefox"
                app_name = "Firefox"
                version = "128"
                categories = ["Internet", "Featured"]
                "#,
            )
            .unwrap(),
        ))
    }

    #[tokio::test]
    async fn available_enumerates_non_featured_categories() {
        let adapter = FlatpakAdapter::new(engine());
        let mut names: Vec<_> = adapter
            .available()
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["org.gimp.GIMP", "org.mozilla.firefox"]);
    }

    #[tokio::test]
    async fn search_is_fail_open_when_disabled() {
        let engine = engine();
        let adapter = FlatpakAdapter::new(Arc::clone(&engine));
        engine.set_enable_flatpak(false);
        assert!(adapter.search("gimp").await.is_empty());
    }
}
