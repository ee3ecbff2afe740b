// folio-admin - Portfolio site admin backend
// Entry point and server startup

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_admin::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_admin=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting folio-admin");

    let config = Config::from_env();
    let bind_addr = config.bind_addr;

    let state = AppState::initialize(config)
        .await
        .context("Failed to initialize application")?;
    let router = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!("Admin API listening on {bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(folio_admin::http::shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}
