use std::sync::Arc;

use anyhow::Context;
use modscout::{ScoutConfig, ToolServer, build_registry};
use modscout_core::spawn_sweeper;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScoutConfig::from_env().context("failed to load configuration")?;
    let settings = config.engine_settings();
    let cache = config.build_cache();
    let _sweeper = spawn_sweeper(&cache);
    let registry = build_registry(&cache, &settings);

    tracing::info!(
        project_root = %settings.project_root.display(),
        ecosystems = ?registry.ecosystem_ids(),
        "modscout {} ready",
        env!("CARGO_PKG_VERSION")
    );

    let server = ToolServer::new(Arc::new(registry));
    server
        .serve(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await
        .context("stdio transport failed")?;
    Ok(())
}
