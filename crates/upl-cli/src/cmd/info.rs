//! Info command

use anyhow::{Context, Result, bail};

use upl_core::{
    DetailOptions, DetailValue, FlatpakAdapter, NativeAdapter, PackageDetail, PackageFormat,
    SnapAdapter,
};

use crate::Cli;

/// Show details for one package.
pub async fn info(
    cli: &Cli,
    package: &str,
    backend: PackageFormat,
    raw_sizes: bool,
    json: bool,
) -> Result<()> {
    let engine = cli.open_engine()?;
    let opts = if raw_sizes {
        DetailOptions::raw()
    } else {
        DetailOptions::default()
    };

    let detail = match backend {
        PackageFormat::Native => NativeAdapter::new(engine)
            .details(package, opts)
            .await
            .with_context(|| format!("Package '{package}' not found"))?,
        PackageFormat::Snap => SnapAdapter::new(engine).details(package, opts).await,
        PackageFormat::Flatpak => FlatpakAdapter::new(engine).details(package, opts).await,
    };

    if detail.is_empty() {
        bail!("Package '{package}' not found");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&detail_to_json(&detail))?);
        return Ok(());
    }

    let lw = 20;
    println!();
    for (key, value) in detail.iter() {
        println!("  {:<lw$}{value}", key.as_str());
    }
    println!();

    Ok(())
}

fn detail_to_json(detail: &PackageDetail) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        "format".to_string(),
        serde_json::Value::String(detail.format().to_string()),
    );
    for (key, value) in detail.iter() {
        let json = match value {
            DetailValue::Text(s) => serde_json::Value::String(s.clone()),
            DetailValue::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|s| serde_json::Value::String(s.clone()))
                    .collect(),
            ),
            DetailValue::Bytes(n) => serde_json::Value::Number((*n).into()),
            DetailValue::Flag(b) => serde_json::Value::Bool(*b),
        };
        map.insert(key.as_str().to_string(), json);
    }
    serde_json::Value::Object(map)
}
