//! # stockpile-api: Binary Entry Point
//!
//! Reads configuration from the environment, connects the item store,
//! installs the Prometheus recorder and serves until SIGINT or SIGTERM.

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use stockpile_api::config::{AppConfig, LogFormat};
use stockpile_api::repository::ItemRepository;
use stockpile_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    if let Some(value) = &config.unrecognized_environment {
        tracing::warn!(value = %value, "unknown environment, running as development");
    }

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    // No DATABASE_URL means the in-memory repository.
    let repository = match stockpile_api::db::init_pool(&config).await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })? {
        Some(pool) => ItemRepository::Postgres(pool),
        None => ItemRepository::in_memory(),
    };

    let addr = format!("{}:{}", config.host, config.port);
    let environment = config.environment;
    let state = AppState::with_config(config, repository)?.with_metrics(metrics);
    let app = stockpile_api::app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        environment = environment.display_name(),
        "Stockpile API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
