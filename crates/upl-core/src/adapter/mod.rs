//! Backend adapters.
//!
//! One adapter per package source, each wrapping the engine's calls for
//! that backend into the uniform search / available / details surface.
//!
//! Enumeration paths are fail-open: an engine error is logged and the step
//! contributes nothing, so one bad repository or category never aborts the
//! whole aggregation. Callers that need fail-fast semantics should talk to
//! the engine directly.

mod flatpak;
mod native;
mod snap;

pub use flatpak::FlatpakAdapter;
pub use native::NativeAdapter;
pub use snap::SnapAdapter;

use upl_engine::PackageRecord;

/// The reserved category that mirrors other categories' contents and is
/// never used as an enumeration source.
pub(crate) const FEATURED_CATEGORY: &str = "Featured";

/// Append `batch` onto `acc`, skipping records whose name is already there.
pub(crate) fn extend_unique(acc: &mut Vec<PackageRecord>, batch: Vec<PackageRecord>) {
    for record in batch {
        if !acc.iter().any(|seen| seen.name == record.name) {
            acc.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upl_engine::PackageFormat;

    #[test]
    fn extend_unique_dedups_by_name() {
        let mut acc = vec![PackageRecord::new("code", PackageFormat::Snap)];
        extend_unique(
            &mut acc,
            vec![
                PackageRecord::new("code", PackageFormat::Snap),
                PackageRecord::new("spotify", PackageFormat::Snap),
            ],
        );
        let names: Vec<_> = acc.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["code", "spotify"]);
    }
}
