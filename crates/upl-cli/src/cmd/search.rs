//! Search command

use anyhow::Result;

use upl_core::{FlatpakAdapter, NativeAdapter, PackageFormat, PackageRecord, SnapAdapter};

use crate::Cli;
use crate::ui::package_table;

/// Search one or all backends for `query`.
pub async fn search(cli: &Cli, query: &str, backend: Option<PackageFormat>) -> Result<()> {
    let engine = cli.open_engine()?;
    let mut results: Vec<PackageRecord> = Vec::new();

    let wants = |format: PackageFormat| backend.is_none() || backend == Some(format);

    if wants(PackageFormat::Native) {
        results.extend(NativeAdapter::new(engine.clone()).search(query).await);
    }
    if wants(PackageFormat::Snap) {
        results.extend(SnapAdapter::new(engine.clone()).search(query).await);
    }
    if wants(PackageFormat::Flatpak) {
        results.extend(FlatpakAdapter::new(engine.clone()).search(query).await);
    }

    if results.is_empty() {
        println!();
        println!("  No packages found matching '{query}'");
        println!();
        return Ok(());
    }

    println!();
    println!("{}", package_table(&results));
    println!();
    println!("SEARCH COMPLETE {}", results.len());

    Ok(())
}
