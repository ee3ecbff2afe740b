//! Storage module
//!
//! Provides the on-disk store for uploaded document and image bytes.

pub mod uploads;

pub use uploads::{content_hash, StoredFile, UploadStore};
