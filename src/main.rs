//! llm-relay binary entry point

use color_eyre::eyre::Context;
use color_eyre::Result;
use llm_relay::{cli::Cli, config::RelayConfig, providers::ProviderRegistry, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    // Parse CLI arguments; a .env file is honored for everything else
    let cli = Cli::parse_args();
    dotenv::dotenv().ok();

    // Set up logging
    let filter = if cli.verbose { "llm_relay=debug,tower_http=debug" } else { "llm_relay=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    // Resolve configuration once; it is immutable afterwards
    let mut config = RelayConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }

    let registry = ProviderRegistry::from_config(&config)?;
    for &(kind, enabled) in registry.statuses() {
        tracing::info!(provider = %kind, enabled, "provider status");
    }
    let app = server::build_router(registry);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "llm-relay listening");

    axum::serve(listener, app).await.wrap_err("server error")?;

    Ok(())
}
