//! Database models
//!
//! Rust structs representing database rows, plus the request types the
//! admin API accepts. All models use serde for serialization to JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message left by a site visitor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A document category; names are unique
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

/// An uploaded document or image
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,
    /// Sanitized original filename, shown in listings and downloads
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// SHA-256 hash of the file content
    pub sha256: String,
    /// Uploads-relative path when stored on disk, None when stored as a blob
    pub stored_path: Option<String>,
    pub category_id: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Document row joined with its category name, as shown in listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentWithCategory {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub stored_path: Option<String>,
    pub category_id: String,
    pub category: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Storage-resolved fields shared by document creation and file replacement.
/// `stored_path` and `blob` are mutually exclusive: exactly one is set,
/// depending on the configured upload storage.
#[derive(Debug)]
pub struct StoredDocumentFile {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub stored_path: Option<String>,
    pub blob: Option<Vec<u8>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    pub filename: Option<String>,
    pub category_id: Option<String>,
}

/// The page text and metadata record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageProfile {
    pub id: String,
    pub name: String,
    pub job_title: String,
    pub slogan: String,
    pub about_me: String,
    pub profile_image_url: String,
    pub about_image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageProfileRequest {
    pub name: String,
    pub job_title: String,
    pub slogan: String,
    pub about_me: String,
    pub profile_image_url: String,
    pub about_image_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePageProfileRequest {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub slogan: Option<String>,
    pub about_me: Option<String>,
    pub profile_image_url: Option<String>,
    pub about_image_url: Option<String>,
}

/// A footer link to an external profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialLink {
    pub id: String,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSocialLinkRequest {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSocialLinkRequest {
    pub label: Option<String>,
    pub url: Option<String>,
}

/// A titled entry in the about section
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileFact {
    pub id: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileFactRequest {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileFactRequest {
    pub title: Option<String>,
    pub detail: Option<String>,
}
