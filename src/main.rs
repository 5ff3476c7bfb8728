use offer_board::{router, ApiClient, AppState, Config, OfferApi};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let client = ApiClient::new(config.api_base_url.clone(), config.api_timeout)?;

    match client.check_health().await {
        Ok(response) => info!("backend at {} is up: {}", client.base_url(), response.message),
        Err(err) => warn!("backend at {} is not reachable yet: {err}", client.base_url()),
    }

    let state = AppState::new(Arc::new(client));
    let app = router(state);

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
