//! upl - a Unified Package Layer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! One frontend over three package backends: native distro packages,
//! snaps, and flatpaks. Queries fan out to the backend adapters; installs
//! and removals are staged and submitted as a single transaction batch
//! against the package engine.
//!
//! The engine is selected by `--catalog`: a TOML catalog file backing the
//! in-memory reference engine. A daemon-backed engine plugs in behind the
//! same boundary without touching this crate.

pub mod cmd;
pub mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use upl_core::{MemoryEngine, PackageFormat, Settings};

fn parse_backend(s: &str) -> Result<PackageFormat, String> {
    s.parse()
}

#[derive(Debug, Parser)]
#[command(name = "upl")]
#[command(author, version, about = "upl - a unified package layer over native, snap, and flatpak")]
pub struct Cli {
    /// Catalog file backing the engine
    #[arg(long, global = true, env = "UPL_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Engine config file (snap/flatpak enablement, download slots)
    #[arg(long, global = true, env = "UPL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would happen without making changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search available packages across backends
    Search {
        /// Search query
        query: String,
        /// Restrict to one backend (native, snap, flatpak)
        #[arg(long, value_parser = parse_backend)]
        backend: Option<PackageFormat>,
    },
    /// Show package details
    Info {
        /// Package name
        package: String,
        /// Backend to ask (native, snap, flatpak)
        #[arg(long, value_parser = parse_backend, default_value = "native")]
        backend: PackageFormat,
        /// Print raw byte counts instead of human-readable sizes
        #[arg(long)]
        raw_sizes: bool,
        /// Emit the detail as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every available package
    Available {
        /// Restrict to one backend (native, snap, flatpak)
        #[arg(long, value_parser = parse_backend)]
        backend: Option<PackageFormat>,
    },
    /// List installed native packages
    List,
    /// Show repositories and categories
    Sources,
    /// Install packages
    Install {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
        /// Backend the packages belong to (native, snap, flatpak)
        #[arg(long, value_parser = parse_backend, default_value = "native")]
        backend: PackageFormat,
        /// Upgrade the whole system before installing
        #[arg(long)]
        system_update: bool,
    },
    /// Remove packages
    Remove {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
        /// Backend the packages belong to (native, snap, flatpak)
        #[arg(long, value_parser = parse_backend, default_value = "native")]
        backend: PackageFormat,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// Open the engine this invocation runs against.
    pub fn open_engine(&self) -> Result<Arc<MemoryEngine>> {
        let catalog_path = self
            .catalog
            .as_ref()
            .context("No catalog found. Pass --catalog or set UPL_CATALOG.")?;
        let catalog = upl_core::Catalog::load(catalog_path)
            .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

        let settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load engine config {}", path.display()))?,
            None => Settings::default(),
        };

        Ok(Arc::new(MemoryEngine::with_settings(catalog, &settings)))
    }

    /// Transaction options for this invocation.
    pub fn transaction_options(&self, system_update: bool) -> upl_core::TransactionOptions {
        upl_core::TransactionOptions {
            config_path: self
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from("/etc/upl/engine.conf")),
            dry_run: self.dry_run,
            system_update,
        }
    }
}
