//! Display-ready package details.
//!
//! A [`PackageDetail`] is an ordered mapping from a fixed set of semantic
//! keys to values. The populated key set varies by backend: native records
//! carry the full dependency/relation block, snaps the store metadata,
//! flatpaks a plain subset.

use std::collections::BTreeMap;
use std::fmt;

use upl_engine::PackageFormat;

use crate::humanize::format_bytes;

/// Semantic detail keys, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)] // the variant names are the documentation
pub enum DetailKey {
    Name,
    Title,
    AppId,
    PackageId,
    Description,
    LongDescription,
    Version,
    InstalledVersion,
    Repository,
    License,
    Url,
    Icon,
    Screenshots,
    Launchable,
    InstallDate,
    BuildDate,
    DownloadSize,
    InstalledSize,
    Publisher,
    Channel,
    Channels,
    Confined,
    Depends,
    OptDepends,
    MakeDepends,
    CheckDepends,
    RequiredBy,
    OptionalFor,
    Conflicts,
    Provides,
    Replaces,
    Groups,
    Backups,
    Packager,
    Reason,
    HasSignature,
}

impl DetailKey {
    /// Stable snake_case label for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::AppId => "app_id",
            Self::PackageId => "pkg_id",
            Self::Description => "description",
            Self::LongDescription => "long_description",
            Self::Version => "version",
            Self::InstalledVersion => "installed_version",
            Self::Repository => "repository",
            Self::License => "license",
            Self::Url => "url",
            Self::Icon => "icon",
            Self::Screenshots => "screenshots",
            Self::Launchable => "launchable",
            Self::InstallDate => "install_date",
            Self::BuildDate => "build_date",
            Self::DownloadSize => "download_size",
            Self::InstalledSize => "installed_size",
            Self::Publisher => "publisher",
            Self::Channel => "channel",
            Self::Channels => "channels",
            Self::Confined => "confined",
            Self::Depends => "depends",
            Self::OptDepends => "optdepends",
            Self::MakeDepends => "makedepends",
            Self::CheckDepends => "checkdepends",
            Self::RequiredBy => "required_by",
            Self::OptionalFor => "optional_for",
            Self::Conflicts => "conflicts",
            Self::Provides => "provides",
            Self::Replaces => "replaces",
            Self::Groups => "groups",
            Self::Backups => "backups",
            Self::Packager => "packager",
            Self::Reason => "reason",
            Self::HasSignature => "has_signature",
        }
    }
}

impl fmt::Display for DetailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detail value.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    /// Free-form text.
    Text(String),
    /// A list, joined with ", " for display.
    List(Vec<String>),
    /// A raw byte count.
    Bytes(u64),
    /// A boolean flag.
    Flag(bool),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Bytes(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// How details are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    /// Render byte sizes as "12.3 MB" text instead of raw counts.
    pub human_readable: bool,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            human_readable: true,
        }
    }
}

impl DetailOptions {
    /// Options rendering raw byte counts.
    pub fn raw() -> Self {
        Self {
            human_readable: false,
        }
    }

    pub(crate) fn size_value(self, bytes: u64) -> DetailValue {
        if self.human_readable {
            DetailValue::Text(format_bytes(bytes))
        } else {
            DetailValue::Bytes(bytes)
        }
    }
}

/// The uniform descriptive mapping for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDetail {
    format: PackageFormat,
    fields: BTreeMap<DetailKey, DetailValue>,
}

impl PackageDetail {
    /// An empty detail for `format`.
    pub fn empty(format: PackageFormat) -> Self {
        Self {
            format,
            fields: BTreeMap::new(),
        }
    }

    /// The backend the detail describes.
    pub fn format(&self) -> PackageFormat {
        self.format
    }

    /// Value for `key`, if populated.
    pub fn get(&self, key: DetailKey) -> Option<&DetailValue> {
        self.fields.get(&key)
    }

    /// Iterate populated keys in display order.
    pub fn iter(&self) -> impl Iterator<Item = (DetailKey, &DetailValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Number of populated keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing is populated.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, key: DetailKey, value: DetailValue) {
        self.fields.insert(key, value);
    }

    pub(crate) fn insert_text(&mut self, key: DetailKey, value: impl Into<String>) {
        self.insert(key, DetailValue::Text(value.into()));
    }

    pub(crate) fn insert_opt(&mut self, key: DetailKey, value: Option<&String>) {
        if let Some(v) = value {
            self.insert_text(key, v.clone());
        }
    }

    pub(crate) fn insert_list(&mut self, key: DetailKey, values: &[String]) {
        if !values.is_empty() {
            self.insert(key, DetailValue::List(values.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_iterate_in_display_order() {
        let mut detail = PackageDetail::empty(PackageFormat::Native);
        detail.insert_text(DetailKey::Version, "1.0");
        detail.insert_text(DetailKey::Name, "htop");
        let keys: Vec<_> = detail.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![DetailKey::Name, DetailKey::Version]);
    }

    #[test]
    fn size_rendering_follows_options() {
        assert_eq!(
            DetailOptions::default().size_value(1024),
            DetailValue::Text("1.0 KB".to_string())
        );
        assert_eq!(
            DetailOptions::raw().size_value(1024),
            DetailValue::Bytes(1024)
        );
    }

    #[test]
    fn list_values_join_for_display() {
        let v = DetailValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(v.to_string(), "a, b");
    }
}
