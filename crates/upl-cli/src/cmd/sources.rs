//! Sources command

use anyhow::Result;

use upl_core::Engine;

use crate::Cli;

/// Show the engine's repositories and categories.
pub async fn sources(cli: &Cli) -> Result<()> {
    let engine = cli.open_engine()?;
    let repositories = engine
        .repository_names()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let categories = engine
        .category_names()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!();
    println!("  repositories");
    for repo in &repositories {
        println!("    {repo}");
    }
    println!();
    println!("  categories");
    for category in &categories {
        println!("    {category}");
    }
    println!();

    Ok(())
}
