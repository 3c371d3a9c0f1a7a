//! Raw package records as fetched from the engine.

use serde::{Deserialize, Serialize};

use crate::types::{PackageFormat, PackageName, PackageRef};

/// A package record straight off the engine, before normalization.
///
/// The common fields are populated for every backend; the native and snap
/// field groups are only meaningful for their respective formats and stay
/// empty elsewhere. Fields an engine did not report are `None`/empty rather
/// than invented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Backend this record came from. Assigned by the engine, not the wire.
    #[serde(skip, default)]
    pub format: PackageFormat,
    /// Package name within the backend's namespace.
    pub name: PackageName,
    /// Human-facing application name, when the backend distinguishes one.
    #[serde(default)]
    pub app_name: Option<String>,
    /// AppStream application id.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Backend-internal package id.
    #[serde(default)]
    pub id: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Long description.
    #[serde(default)]
    pub long_description: Option<String>,
    /// Candidate version.
    #[serde(default)]
    pub version: Option<String>,
    /// Installed version, if the package is installed.
    #[serde(default)]
    pub installed_version: Option<String>,
    /// Repository or remote the record came from.
    #[serde(default)]
    pub repository: Option<String>,
    /// License identifier.
    #[serde(default)]
    pub license: Option<String>,
    /// Upstream URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Icon path or URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Screenshot URLs.
    #[serde(default)]
    pub screenshots: Vec<String>,
    /// Install date as a unix timestamp.
    #[serde(default)]
    pub install_date: Option<i64>,
    /// Download size in bytes.
    #[serde(default)]
    pub download_size: Option<u64>,
    /// Installed size in bytes.
    #[serde(default)]
    pub installed_size: Option<u64>,
    /// Desktop entry the package can be launched through.
    #[serde(default)]
    pub launchable: Option<String>,

    // Native-only fields.
    /// Runtime dependencies.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Optional dependencies.
    #[serde(default)]
    pub opt_depends: Vec<String>,
    /// Build-time dependencies.
    #[serde(default)]
    pub make_depends: Vec<String>,
    /// Check-time dependencies.
    #[serde(default)]
    pub check_depends: Vec<String>,
    /// Installed packages requiring this one.
    #[serde(default)]
    pub required_by: Vec<String>,
    /// Installed packages this one is an optional dependency of.
    #[serde(default)]
    pub optional_for: Vec<String>,
    /// Conflicting packages.
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Virtual packages provided.
    #[serde(default)]
    pub provides: Vec<String>,
    /// Packages replaced on upgrade.
    #[serde(default)]
    pub replaces: Vec<String>,
    /// Package groups.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Backup files tracked by the package.
    #[serde(default)]
    pub backups: Vec<String>,
    /// Packager identity.
    #[serde(default)]
    pub packager: Option<String>,
    /// Install reason (explicit or as a dependency).
    #[serde(default)]
    pub install_reason: Option<String>,
    /// Whether the package carries a signature.
    #[serde(default)]
    pub has_signature: Option<bool>,
    /// Build date as a unix timestamp.
    #[serde(default)]
    pub build_date: Option<i64>,

    // Snap-only fields.
    /// Publisher identity.
    #[serde(default)]
    pub publisher: Option<String>,
    /// Tracked channel.
    #[serde(default)]
    pub channel: Option<String>,
    /// All available channels.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Confinement mode ("strict", "classic", ...).
    #[serde(default)]
    pub confined: Option<String>,
}

impl PackageRecord {
    /// Create an empty record for `name` in `format`.
    pub fn new(name: impl Into<PackageName>, format: PackageFormat) -> Self {
        Self {
            format,
            name: name.into(),
            app_name: None,
            app_id: None,
            id: None,
            description: None,
            long_description: None,
            version: None,
            installed_version: None,
            repository: None,
            license: None,
            url: None,
            icon: None,
            screenshots: Vec::new(),
            install_date: None,
            download_size: None,
            installed_size: None,
            launchable: None,
            depends: Vec::new(),
            opt_depends: Vec::new(),
            make_depends: Vec::new(),
            check_depends: Vec::new(),
            required_by: Vec::new(),
            optional_for: Vec::new(),
            conflicts: Vec::new(),
            provides: Vec::new(),
            replaces: Vec::new(),
            groups: Vec::new(),
            backups: Vec::new(),
            packager: None,
            install_reason: None,
            has_signature: None,
            build_date: None,
            publisher: None,
            channel: None,
            channels: Vec::new(),
            confined: None,
        }
    }

    /// Handle for this record.
    pub fn to_ref(&self) -> PackageRef {
        PackageRef::new(self.name.clone(), self.format)
    }

    /// Application name if the backend reports one, otherwise the package
    /// name.
    pub fn display_name(&self) -> &str {
        match &self.app_name {
            Some(app) if !app.is_empty() => app,
            _ => &self.name,
        }
    }

    /// Whether an installed version is known.
    pub fn is_installed(&self) -> bool {
        self.installed_version.is_some()
    }

    /// Snap attributes the store is expected to report but this record
    /// lacks.
    ///
    /// A non-empty result is a signaled, non-fatal condition: the detail
    /// built from this record will simply miss those keys.
    pub fn missing_snap_fields(&self) -> Vec<&'static str> {
        debug_assert_eq!(self.format, PackageFormat::Snap);
        let mut missing = Vec::new();
        if self.channel.is_none() {
            missing.push("channel");
        }
        if self.publisher.is_none() {
            missing.push("publisher");
        }
        if self.confined.is_none() {
            missing.push("confined");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_package_name() {
        let mut rec = PackageRecord::new("htop", PackageFormat::Native);
        assert_eq!(rec.display_name(), "htop");
        rec.app_name = Some("Htop".to_string());
        assert_eq!(rec.display_name(), "Htop");
        rec.app_name = Some(String::new());
        assert_eq!(rec.display_name(), "htop");
    }

    #[test]
    fn missing_snap_fields_reports_gaps() {
        let mut rec = PackageRecord::new("spotify", PackageFormat::Snap);
        assert_eq!(
            rec.missing_snap_fields(),
            vec!["channel", "publisher", "confined"]
        );
        rec.channel = Some("stable".to_string());
        rec.publisher = Some("spotify".to_string());
        rec.confined = Some("strict".to_string());
        assert!(rec.missing_snap_fields().is_empty());
    }
}
