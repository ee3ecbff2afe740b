//! Content-addressed upload storage
//!
//! Stores uploaded file bytes under the uploads directory using the
//! SHA-256 hash as key. Files are organized in a two-level directory
//! structure so no single directory grows unbounded.
//!
//! Example: hash "abcd1234..." is stored at "uploads/ab/cd/abcd1234..."
//!
//! Paths handed back (and recorded on document rows) are relative to the
//! uploads root, so the directory can be served statically under the
//! configured URL prefix or relocated without rewriting rows.

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// A file placed in the store
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Path relative to the uploads root, e.g. "ab/cd/abcd1234..."
    pub relative_path: String,
    /// SHA-256 hash of the content, hex-encoded
    pub sha256: String,
    pub size_bytes: i64,
}

/// Content-addressed store for uploaded files
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a new upload store at the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Initialize the store (create the root directory if needed)
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Upload store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Write uploaded bytes to the store.
    ///
    /// Identical content hashes to the same path, so re-uploading the same
    /// file is a no-op that returns the existing location.
    pub async fn store(&self, data: &[u8]) -> Result<StoredFile> {
        let hash = content_hash(data);
        let relative_path = fanout_path(&hash);
        let path = self.root.join(&relative_path);

        if path.exists() {
            tracing::debug!("Upload already stored: {}", hash);
            return Ok(StoredFile {
                relative_path,
                sha256: hash,
                size_bytes: data.len() as i64,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file first, then rename (atomic write)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(temp_path, &path).await?;

        tracing::debug!("Stored upload: {} ({} bytes)", hash, data.len());

        Ok(StoredFile {
            relative_path,
            sha256: hash,
            size_bytes: data.len() as i64,
        })
    }

    /// Read stored bytes by relative path
    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let path = self.root.join(relative_path);

        if !path.exists() {
            return Err(AppError::Storage(format!(
                "stored file not found: {relative_path}"
            )));
        }

        let mut file = fs::File::open(&path).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;

        Ok(data)
    }

    /// Delete a stored file; deleting a missing file is not an error
    pub async fn remove(&self, relative_path: &str) -> Result<()> {
        let path = self.root.join(relative_path);

        if !path.exists() {
            return Ok(());
        }

        fs::remove_file(&path).await?;
        tracing::debug!("Removed stored upload: {}", relative_path);

        Ok(())
    }

    /// The URL a browser uses for a stored file when the uploads directory
    /// is served statically under `static_prefix`
    pub fn public_url(static_prefix: &str, relative_path: &str) -> String {
        format!("{static_prefix}/{relative_path}")
    }
}

/// Two-level directory structure: ab/cd/abcd1234...
///
/// Derived from the hash only, so a stored path can never escape the
/// uploads root regardless of the uploaded filename.
fn fanout_path(hash: &str) -> String {
    format!("{}/{}/{}", &hash[0..2], &hash[2..4], hash)
}

/// SHA-256 hash of uploaded bytes, hex-encoded. Also recorded on rows
/// whose bytes live in the database rather than in this store.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
