//! Admin backend for a personal portfolio site
//!
//! A JSON HTTP API over SQLite for the records the site's admin panel
//! manages: visitor contact messages, document categories, uploaded
//! documents and images, the page text/metadata record, footer links,
//! and about-section facts. Uploaded bytes are stored on local disk or
//! as database blobs, selected by configuration.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod services;
pub mod storage;

pub use app::AppState;
pub use config::Config;
pub use error::{AppError, Result};
pub use http::build_router;
