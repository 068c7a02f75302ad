use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devserve::config::Config;
use devserve::server::{Server, banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load().context("failed to load configuration")?;

    let root = cfg.resolved_root()?;
    if !root.is_dir() {
        tracing::warn!(
            root = %root.display(),
            "document root does not exist, every request will be 404"
        );
    }

    let cfg = Arc::new(cfg);
    let server = Server::bind(Arc::clone(&cfg)).await?;
    let port = server.local_addr()?.port();

    println!("{}", banner::render(&cfg, &root, port)?);

    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    println!("\nServer stopped");
    Ok(())
}
