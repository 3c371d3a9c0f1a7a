//! Available command

use anyhow::Result;

use upl_core::{FlatpakAdapter, NativeAdapter, PackageFormat, PackageRecord, SnapAdapter};

use crate::Cli;
use crate::ui::package_table;

/// List every available package in one or all backends.
pub async fn available(cli: &Cli, backend: Option<PackageFormat>) -> Result<()> {
    let engine = cli.open_engine()?;
    let mut records: Vec<PackageRecord> = Vec::new();

    let wants = |format: PackageFormat| backend.is_none() || backend == Some(format);

    if wants(PackageFormat::Native) {
        records.extend(NativeAdapter::new(engine.clone()).available().await);
    }
    if wants(PackageFormat::Snap) {
        records.extend(SnapAdapter::new(engine.clone()).available().await);
    }
    if wants(PackageFormat::Flatpak) {
        records.extend(FlatpakAdapter::new(engine.clone()).available().await);
    }

    if records.is_empty() {
        println!();
        println!("  No packages available.");
        return Ok(());
    }

    println!();
    println!("{}", package_table(&records));
    println!();
    println!("{} packages available", records.len());

    Ok(())
}
