//! Application configuration
//!
//! Loaded once at startup from `FOLIO_*` environment variables with logged
//! fallbacks to defaults. Also the central location for validation limits
//! used throughout the application.

use std::collections::HashSet;
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

// ===== Validation Limits =====

/// Maximum filename length kept after sanitization.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Maximum length for names, labels, titles and email addresses.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for a category name.
pub const MAX_CATEGORY_LENGTH: usize = 30;

/// Maximum length for stored URLs (profile images, footer links).
pub const MAX_URL_LENGTH: usize = 255;

// ===== Upload Defaults =====

/// Extensions accepted when `FOLIO_ALLOWED_EXTENSIONS` is not set:
/// the document types plus the image types the page records link to.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "png", "jpg", "jpeg"];

/// Upload body cap when `FOLIO_MAX_UPLOAD_BYTES` is not set (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Where uploaded file bytes are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStorage {
    /// Bytes live under the uploads directory; the row records the
    /// uploads-relative path.
    Disk,
    /// Bytes live in the `document_blobs` table.
    Database,
}

impl FromStr for UploadStorage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(UploadStorage::Disk),
            "database" => Ok(UploadStorage::Database),
            other => Err(format!("expected 'disk' or 'database', got '{other}'")),
        }
    }
}

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub uploads_dir: PathBuf,
    pub upload_storage: UploadStorage,
    /// URL prefix under which disk-stored uploads are served.
    pub static_prefix: String,
    pub allowed_extensions: HashSet<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir: PathBuf = try_load("FOLIO_DATA_DIR", "./data");
        let database_path = var("FOLIO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("folio.db"));
        let uploads_dir = var("FOLIO_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("uploads"));
        let allowed_extensions = var("FOLIO_ALLOWED_EXTENSIONS")
            .map(|raw| parse_extensions(&raw))
            .unwrap_or_else(default_extensions);

        Self {
            bind_addr: try_load("FOLIO_BIND", "127.0.0.1:8087"),
            database_path,
            uploads_dir,
            upload_storage: try_load("FOLIO_UPLOAD_STORAGE", "disk"),
            static_prefix: normalize_prefix(
                var("FOLIO_STATIC_PREFIX").as_deref().unwrap_or("/static/uploads"),
            ),
            allowed_extensions,
            max_upload_bytes: try_load("FOLIO_MAX_UPLOAD_BYTES", "16777216"),
            data_dir,
        }
    }

    /// Check if the file extension is allowed.
    ///
    /// A filename passes when it contains a dot and its final extension,
    /// lowercased, is on the allow-list.
    pub fn allowed_file(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self.allowed_extensions.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| {
            warn!("Invalid {key} value {raw:?}: {e}");
        })
        .expect("Environment misconfigured!")
}

fn default_extensions() -> HashSet<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

/// Split a comma-separated extension list, lowercasing entries and
/// dropping leading dots and empties.
fn parse_extensions(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Static prefixes always start with a slash and never end with one.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/static/uploads".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
