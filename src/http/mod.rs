//! HTTP surface
//!
//! The admin API router and the handlers behind it, one submodule per
//! entity:
//! - `contacts`: visitor contact messages
//! - `categories`: document categories
//! - `documents`: uploads, downloads, and the form-support endpoint
//! - `profile`: the page text/metadata record
//! - `links`: footer links
//! - `facts`: about-section entries

pub mod categories;
pub mod contacts;
pub mod documents;
pub mod facts;
pub mod links;
pub mod profile;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::get;
use axum::{Json, Router};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::app::AppState;
use crate::config::UploadStorage;

/// Assemble the application router.
///
/// All admin endpoints live under `/admin`. In disk storage mode the
/// uploads directory is additionally served read-only under the
/// configured static prefix, so stored files resolve at their public
/// URLs.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let admin = Router::new()
        .route("/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/contacts/:id",
            get(contacts::get)
                .put(contacts::update)
                .delete(contacts::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/documents", get(documents::list).post(documents::upload))
        .route("/documents/form", get(documents::form))
        .route(
            "/documents/:id",
            get(documents::get)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route(
            "/documents/:id/file",
            get(documents::download).put(documents::replace_file),
        )
        .route("/profile", get(profile::list).post(profile::create))
        .route(
            "/profile/:id",
            get(profile::get).put(profile::update).delete(profile::delete),
        )
        .route("/links", get(links::list).post(links::create))
        .route(
            "/links/:id",
            get(links::get).put(links::update).delete(links::delete),
        )
        .route("/facts", get(facts::list).post(facts::create))
        .route(
            "/facts/:id",
            get(facts::get).put(facts::update).delete(facts::delete),
        );

    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .nest("/admin", admin)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors);

    if state.config.upload_storage == UploadStorage::Disk {
        router = router.nest_service(
            state.config.static_prefix.as_str(),
            ServeDir::new(&state.config.uploads_dir),
        );
    }

    router.with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Resolves on Ctrl+C or SIGTERM, triggering graceful shutdown
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
