use anyhow::Context;
use grant_config::GrantConfig;
use grant_server::{AppState, build_router};
use tokio::net::TcpListener;

use crate::bootstrap;

/// Handle `grant-tracker serve`: run until Ctrl-C, then drain in-flight
/// requests and close the database.
pub async fn handle(config: &GrantConfig) -> anyhow::Result<()> {
    let service = bootstrap::open_service(config).await?;
    let state = AppState::new(service, config);
    state
        .uploads
        .ensure_dir()
        .await
        .context("failed to prepare upload directory")?;

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(address = %listener.local_addr()?, "grant tracker listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
