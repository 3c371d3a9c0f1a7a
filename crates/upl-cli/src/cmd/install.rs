//! Install command

use std::sync::Arc;

use anyhow::{Result, bail};

use upl_core::{Coordinator, Direction, NativeAdapter, PackageFormat, PackageName};

use crate::Cli;
use crate::ui::ConsoleObserver;

/// Stage `packages` for installation and run one transaction.
pub async fn install(
    cli: &Cli,
    packages: &[String],
    backend: PackageFormat,
    system_update: bool,
) -> Result<()> {
    let engine = cli.open_engine()?;
    let names: Vec<PackageName> = packages.iter().map(|p| PackageName::new(p)).collect();

    let candidates = if backend == PackageFormat::Native {
        // Drop unknown or already-installed names before staging.
        NativeAdapter::new(engine.clone())
            .sanitize(&names)
            .await
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        names
    };

    if candidates.is_empty() {
        println!("  Nothing to do.");
        return Ok(());
    }

    let options = cli.transaction_options(system_update);
    let observer = Arc::new(ConsoleObserver::new(cli.quiet));
    let mut coordinator = Coordinator::with_observer(engine, options, observer);
    coordinator
        .selection_mut()
        .add(Direction::Install, backend, candidates);

    if !cli.quiet {
        println!();
        for staged in coordinator.selection().refs(Direction::Install) {
            println!("  staging {staged}");
        }
    }

    let outcome = coordinator.run().await;
    if !outcome.is_success() {
        bail!("Transaction failed");
    }

    Ok(())
}
