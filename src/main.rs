use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::info;

use catalog_aggregator::api::create_router;
use catalog_aggregator::app::AppState;
use catalog_aggregator::config::AppConfig;
use catalog_aggregator::infra::{
    HttpUpstreamClient, RetryPolicy, RetryingFetcher, init_metrics_handle, init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);
    let metrics = init_metrics_handle();

    // Instantiate infrastructure components
    let transport = Arc::new(HttpUpstreamClient::new(&config.upstream)?);
    let fetcher = Arc::new(RetryingFetcher::with_tokio_delay(
        transport,
        RetryPolicy::from(&config.upstream),
    ));

    let app_state = Arc::new(AppState::new(fetcher).with_metrics(metrics));
    let router = create_router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        addr = %addr,
        upstream = %config.upstream.base_url,
        max_attempts = config.upstream.max_attempts,
        "Server starting"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
