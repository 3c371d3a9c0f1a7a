//! Engine configuration file parsing.
//!
//! The engine owns its config file and its dialect: one directive per line,
//! either a bare flag (`EnableSnap`) or a `Key = Value` pair, with `#`
//! starting a comment. We parse the directives upl cares about and ignore
//! the rest; the file is consumed here, never written.

use std::path::Path;
use thiserror::Error;

/// Failures loading the engine config file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// A directive carried a value that does not parse.
    #[error("invalid value for {key} on line {line}: {value}")]
    InvalidValue {
        /// Directive name.
        key: String,
        /// 1-based line number.
        line: usize,
        /// Offending value text.
        value: String,
    },
}

/// Parsed engine settings.
///
/// These are the startup defaults; snap/flatpak enablement can still be
/// flipped at runtime through the engine's config surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Snap plugin enabled.
    pub enable_snap: bool,
    /// Flatpak plugin enabled.
    pub enable_flatpak: bool,
    /// Check free disk space before a transaction.
    pub check_space: bool,
    /// Parallel download slots.
    pub max_parallel_downloads: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_snap: false,
            enable_flatpak: false,
            check_space: true,
            max_parallel_downloads: 1,
        }
    }
}

impl Settings {
    /// Load settings from the engine config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse settings from config file text.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (line, None),
            };

            match key {
                // Bare flags: presence means enabled.
                "EnableSnap" => settings.enable_snap = parse_flag(key, idx + 1, value)?,
                "EnableFlatpak" => settings.enable_flatpak = parse_flag(key, idx + 1, value)?,
                "CheckSpace" => settings.check_space = parse_flag(key, idx + 1, value)?,
                "MaxParallelDownloads" => {
                    let text = value.unwrap_or("");
                    settings.max_parallel_downloads =
                        text.parse().map_err(|_| SettingsError::InvalidValue {
                            key: key.to_string(),
                            line: idx + 1,
                            value: text.to_string(),
                        })?;
                }
                // Unknown directives belong to the engine, not to us.
                _ => {}
            }
        }

        Ok(settings)
    }
}

fn parse_flag(key: &str, line: usize, value: Option<&str>) -> Result<bool, SettingsError> {
    match value {
        None => Ok(true),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            line,
            value: other.to_string(),
        }),
    }
}
