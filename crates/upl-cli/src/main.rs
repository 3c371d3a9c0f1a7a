//! upl - a Unified Package Layer CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use upl_cli::cmd;
use upl_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Search { query, backend } => cmd::search::search(&cli, query, *backend).await,
        Commands::Info {
            package,
            backend,
            raw_sizes,
            json,
        } => cmd::info::info(&cli, package, *backend, *raw_sizes, *json).await,
        Commands::Available { backend } => cmd::available::available(&cli, *backend).await,
        Commands::List => cmd::list::list(&cli).await,
        Commands::Sources => cmd::sources::sources(&cli).await,
        Commands::Install {
            packages,
            backend,
            system_update,
        } => cmd::install::install(&cli, packages, *backend, *system_update).await,
        Commands::Remove { packages, backend } => {
            cmd::remove::remove(&cli, packages, *backend).await
        }
        Commands::Completions { shell } => {
            cmd::completions::completions(*shell);
            Ok(())
        }
    }
}
