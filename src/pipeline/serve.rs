//! HTTP server with a background refresh timer.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::cache::ScheduleCache;
use crate::error::Result;
use crate::models::Config;
use crate::server;

/// Initialize the cache, start the refresh timer and serve until Ctrl-C.
///
/// On shutdown the timer is stopped and an in-flight refresh is allowed to
/// finish its current attempt without persisting.
pub async fn run_server(config: &Config, cache: Arc<ScheduleCache>) -> Result<()> {
    cache.init().await;
    let refresh_loop = cache.spawn_refresh_loop();
    log::info!(
        "Refreshing every {} minutes",
        config.cache.refresh_interval_mins
    );

    let app = server::router(Arc::clone(&cache), &config.server)?;
    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;
    log::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache.shutdown();
    if let Err(e) = refresh_loop.await {
        log::warn!("Refresh loop ended abnormally: {}", e);
    }

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    log::info!("Shutdown signal received");
}
