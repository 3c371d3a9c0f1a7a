//! Core identifier types shared across the engine boundary.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A package name as known to its backend.
///
/// Stored trimmed; comparisons are exact. Snap and flatpak names are
/// case-sensitive upstream, so no case folding happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name, trimming surrounding whitespace.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_string())
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == **other
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

/// Which backend a package belongs to.
///
/// Determines the adapter that serves it and the detail key set its records
/// carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// Native distro package from a repository.
    #[default]
    Native,
    /// Universal snap package.
    Snap,
    /// Flatpak application.
    Flatpak,
}

impl PackageFormat {
    /// Stable lowercase name, matching the catalog file sections.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Snap => "snap",
            Self::Flatpak => "flatpak",
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "pkg" | "package" => Ok(Self::Native),
            "snap" => Ok(Self::Snap),
            "flatpak" => Ok(Self::Flatpak),
            other => Err(format!("unknown package format: {other}")),
        }
    }
}

/// A cheap, clonable handle to a package in exactly one backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    /// The package name within its backend's namespace.
    pub name: PackageName,
    /// The backend the name belongs to.
    pub format: PackageFormat,
}

impl PackageRef {
    /// Create a ref for `name` in `format`.
    pub fn new(name: impl Into<PackageName>, format: PackageFormat) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.format, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_trims() {
        assert_eq!(PackageName::new("  htop "), "htop");
    }

    #[test]
    fn package_name_is_case_sensitive() {
        assert_ne!(PackageName::new("Htop"), PackageName::new("htop"));
    }

    #[test]
    fn format_round_trips_through_str() {
        for fmt in [
            PackageFormat::Native,
            PackageFormat::Snap,
            PackageFormat::Flatpak,
        ] {
            assert_eq!(fmt.as_str().parse::<PackageFormat>().unwrap(), fmt);
        }
        assert!("deb".parse::<PackageFormat>().is_err());
    }

    #[test]
    fn ref_displays_with_format_prefix() {
        let r = PackageRef::new("htop", PackageFormat::Native);
        assert_eq!(r.to_string(), "native/htop");
    }
}
