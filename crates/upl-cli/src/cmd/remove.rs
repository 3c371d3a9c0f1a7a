//! Remove command

use std::sync::Arc;

use anyhow::{Result, bail};

use upl_core::{Coordinator, Direction, PackageFormat, PackageName};

use crate::Cli;
use crate::ui::ConsoleObserver;

/// Stage `packages` for removal and run one transaction.
pub async fn remove(cli: &Cli, packages: &[String], backend: PackageFormat) -> Result<()> {
    let engine = cli.open_engine()?;
    let names: Vec<PackageName> = packages.iter().map(|p| PackageName::new(p)).collect();

    let options = cli.transaction_options(false);
    let observer = Arc::new(ConsoleObserver::new(cli.quiet));
    let mut coordinator = Coordinator::with_observer(engine, options, observer);
    coordinator
        .selection_mut()
        .add(Direction::Remove, backend, names);

    if !cli.quiet {
        println!();
        for staged in coordinator.selection().refs(Direction::Remove) {
            println!("  staging {staged}");
        }
    }

    let outcome = coordinator.run().await;
    if !outcome.is_success() {
        bail!("Transaction failed");
    }

    Ok(())
}
