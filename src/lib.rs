pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use state::SharedState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Init)) {
        return cli::cmd_init();
    }

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    match cli.command {
        None => run_server(config, None).await,
        Some(Commands::Serve { port }) => run_server(config, port).await,
        Some(Commands::Migrate) => cli::cmd_migrate(&config).await,
        Some(Commands::CreateSuperuser {
            email,
            password,
            name,
        }) => cli::cmd_create_superuser(config, &email, &password, name).await,
        Some(Commands::Init) => Ok(()),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn install_metrics(config: &Config) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    use metrics_exporter_prometheus::PrometheusBuilder;
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

async fn run_server(config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Recipe API v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = install_metrics(&config)?;
    let port = port_override.unwrap_or(config.server.port);

    let shared = Arc::new(SharedState::new(config).await?);
    let api_state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(api_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
