//! List command

use anyhow::Result;

use upl_core::Engine;

use crate::Cli;
use crate::ui::package_table;

/// List installed native packages.
pub async fn list(cli: &Cli) -> Result<()> {
    let engine = cli.open_engine()?;
    let installed = engine
        .installed_packages()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if installed.is_empty() {
        println!();
        println!("  No packages installed.");
        return Ok(());
    }

    println!();
    println!("{}", package_table(&installed));
    println!();
    println!("{} packages installed", installed.len());

    Ok(())
}
