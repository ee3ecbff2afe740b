//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities.
//! Constraint violations that admins can run into (duplicate category
//! names, deleting a category that still has documents) surface as
//! conflicts rather than raw database errors.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Map unique and foreign-key violations to a Conflict with a readable
/// message; pass everything else through as a database error.
fn constraint_conflict(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Shared dynamic UPDATE builder for string columns. Maps zero
    /// affected rows to NotFound; an empty set list is a no-op.
    async fn update_fields(
        &self,
        table: &str,
        entity: &'static str,
        id: &str,
        sets: &[&str],
        params: Vec<String>,
    ) -> Result<()> {
        if sets.is_empty() {
            return Ok(());
        }

        let query = format!("UPDATE {table} SET {} WHERE id = ?", sets.join(", "));

        let mut q = sqlx::query(&query);
        for param in &params {
            q = q.bind(param);
        }

        let rows_affected = q.bind(id).execute(&self.pool).await?.rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(entity, id.to_string()));
        }

        Ok(())
    }

    // ===== Contacts =====

    /// Create a contact message
    pub async fn create_contact(&self, req: CreateContactRequest) -> Result<Contact> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, email, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.message)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created contact: {}", id);
        Ok(contact)
    }

    /// Get a contact by ID
    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("contact", id.to_string()))
    }

    /// List contacts, newest first
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let contacts =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(contacts)
    }

    /// Update a contact
    pub async fn update_contact(&self, id: &str, req: UpdateContactRequest) -> Result<Contact> {
        let mut sets = Vec::new();
        let mut params = Vec::new();

        if let Some(name) = req.name {
            sets.push("name = ?");
            params.push(name);
        }
        if let Some(email) = req.email {
            sets.push("email = ?");
            params.push(email);
        }
        if let Some(message) = req.message {
            sets.push("message = ?");
            params.push(message);
        }

        self.update_fields("contacts", "contact", id, &sets, params)
            .await?;
        self.get_contact(id).await
    }

    /// Delete a contact
    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("contact", id.to_string()));
        }

        tracing::debug!("Deleted contact: {}", id);
        Ok(())
    }

    // ===== Categories =====

    /// Create a category; duplicate names are a conflict
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let id = Uuid::new_v4().to_string();

        let category =
            sqlx::query_as::<_, Category>("INSERT INTO categories (id, name) VALUES (?, ?) RETURNING *")
                .bind(&id)
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| constraint_conflict(e, &format!("category already exists: {name}")))?;

        tracing::debug!("Created category: {} ({})", id, name);
        Ok(category)
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: &str) -> Result<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("category", id.to_string()))
    }

    /// List categories alphabetically. Also the source of the document
    /// form's dropdown choices, so the pairs come back ordered.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Rename a category; duplicate names are a conflict
    pub async fn rename_category(&self, id: &str, name: &str) -> Result<Category> {
        let rows = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| constraint_conflict(e, &format!("category already exists: {name}")))?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("category", id.to_string()));
        }

        self.get_category(id).await
    }

    /// Delete a category. Categories with documents attached cannot be
    /// deleted; the documents must be moved or removed first.
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE category_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "category has {in_use} document(s) attached"
            )));
        }

        let rows = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| constraint_conflict(e, "category still has documents attached"))?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("category", id.to_string()));
        }

        tracing::debug!("Deleted category: {}", id);
        Ok(())
    }

    // ===== Documents =====

    /// Insert a document row, and its blob in the same transaction when
    /// the bytes are database-stored.
    pub async fn create_document(
        &self,
        category_id: &str,
        file: StoredDocumentFile,
    ) -> Result<Document> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents
                (id, filename, content_type, size_bytes, sha256, stored_path, category_id, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(&file.sha256)
        .bind(&file.stored_path)
        .bind(category_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(data) = &file.blob {
            sqlx::query("INSERT INTO document_blobs (document_id, data) VALUES (?, ?)")
                .bind(&id)
                .bind(data.as_slice())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Created document: {} ({} bytes)", id, file.size_bytes);
        Ok(document)
    }

    /// Get a document by ID
    pub async fn get_document(&self, id: &str) -> Result<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("document", id.to_string()))
    }

    /// List documents with their category names, newest first
    pub async fn list_documents(&self) -> Result<Vec<DocumentWithCategory>> {
        let documents = sqlx::query_as::<_, DocumentWithCategory>(
            r#"
            SELECT d.id, d.filename, d.content_type, d.size_bytes, d.sha256,
                   d.stored_path, d.category_id, c.name AS category, d.uploaded_at
            FROM documents d
            JOIN categories c ON c.id = d.category_id
            ORDER BY d.uploaded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// Update document metadata (display filename, category)
    pub async fn update_document(&self, id: &str, req: UpdateDocumentRequest) -> Result<Document> {
        let mut sets = Vec::new();
        let mut params = Vec::new();

        if let Some(filename) = req.filename {
            sets.push("filename = ?");
            params.push(filename);
        }
        if let Some(category_id) = req.category_id {
            sets.push("category_id = ?");
            params.push(category_id);
        }

        self.update_fields("documents", "document", id, &sets, params)
            .await?;
        self.get_document(id).await
    }

    /// Swap a document's stored content for a re-uploaded file. The blob
    /// row follows the new storage location; the original upload date is
    /// kept.
    pub async fn replace_document_file(
        &self,
        id: &str,
        file: StoredDocumentFile,
    ) -> Result<Document> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r#"
            UPDATE documents
            SET filename = ?, content_type = ?, size_bytes = ?, sha256 = ?, stored_path = ?
            WHERE id = ?
            "#,
        )
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(&file.sha256)
        .bind(&file.stored_path)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("document", id.to_string()));
        }

        sqlx::query("DELETE FROM document_blobs WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(data) = &file.blob {
            sqlx::query("INSERT INTO document_blobs (document_id, data) VALUES (?, ?)")
                .bind(id)
                .bind(data.as_slice())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Replaced file for document: {}", id);
        self.get_document(id).await
    }

    /// Delete a document, returning its stored path (if any) so the
    /// caller can release the disk bytes. Blob rows go with the row.
    pub async fn delete_document(&self, id: &str) -> Result<Option<String>> {
        let stored_path: Option<Option<String>> =
            sqlx::query_scalar("SELECT stored_path FROM documents WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored_path) = stored_path else {
            return Err(AppError::NotFound("document", id.to_string()));
        };

        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted document: {}", id);
        Ok(stored_path)
    }

    /// Count documents whose content lives at the given stored path.
    /// Content addressing can share one file between documents.
    pub async fn count_documents_with_path(&self, stored_path: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE stored_path = ?")
                .bind(stored_path)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Read the blob bytes of a database-stored document
    pub async fn read_document_blob(&self, document_id: &str) -> Result<Vec<u8>> {
        let data: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT data FROM document_blobs WHERE document_id = ?")
                .bind(document_id)
                .fetch_optional(&self.pool)
                .await?;

        data.ok_or_else(|| {
            AppError::Storage(format!("document has no stored blob: {document_id}"))
        })
    }

    // ===== Page profile =====

    /// Create the page text/metadata record
    pub async fn create_page_profile(&self, req: CreatePageProfileRequest) -> Result<PageProfile> {
        let id = Uuid::new_v4().to_string();

        let profile = sqlx::query_as::<_, PageProfile>(
            r#"
            INSERT INTO page_profile
                (id, name, job_title, slogan, about_me, profile_image_url, about_image_url)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.job_title)
        .bind(&req.slogan)
        .bind(&req.about_me)
        .bind(&req.profile_image_url)
        .bind(&req.about_image_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created page profile: {}", id);
        Ok(profile)
    }

    /// Get a page profile by ID
    pub async fn get_page_profile(&self, id: &str) -> Result<PageProfile> {
        sqlx::query_as::<_, PageProfile>("SELECT * FROM page_profile WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("page profile", id.to_string()))
    }

    /// List page profiles
    pub async fn list_page_profiles(&self) -> Result<Vec<PageProfile>> {
        let profiles =
            sqlx::query_as::<_, PageProfile>("SELECT * FROM page_profile ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(profiles)
    }

    /// Update a page profile
    pub async fn update_page_profile(
        &self,
        id: &str,
        req: UpdatePageProfileRequest,
    ) -> Result<PageProfile> {
        let mut sets = Vec::new();
        let mut params = Vec::new();

        if let Some(name) = req.name {
            sets.push("name = ?");
            params.push(name);
        }
        if let Some(job_title) = req.job_title {
            sets.push("job_title = ?");
            params.push(job_title);
        }
        if let Some(slogan) = req.slogan {
            sets.push("slogan = ?");
            params.push(slogan);
        }
        if let Some(about_me) = req.about_me {
            sets.push("about_me = ?");
            params.push(about_me);
        }
        if let Some(profile_image_url) = req.profile_image_url {
            sets.push("profile_image_url = ?");
            params.push(profile_image_url);
        }
        if let Some(about_image_url) = req.about_image_url {
            sets.push("about_image_url = ?");
            params.push(about_image_url);
        }

        self.update_fields("page_profile", "page profile", id, &sets, params)
            .await?;
        self.get_page_profile(id).await
    }

    /// Delete a page profile
    pub async fn delete_page_profile(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM page_profile WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("page profile", id.to_string()));
        }

        tracing::debug!("Deleted page profile: {}", id);
        Ok(())
    }

    // ===== Social links =====

    /// Create a footer link
    pub async fn create_social_link(&self, req: CreateSocialLinkRequest) -> Result<SocialLink> {
        let id = Uuid::new_v4().to_string();

        let link = sqlx::query_as::<_, SocialLink>(
            "INSERT INTO social_links (id, label, url) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&id)
        .bind(&req.label)
        .bind(&req.url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created social link: {} ({})", id, link.label);
        Ok(link)
    }

    /// Get a footer link by ID
    pub async fn get_social_link(&self, id: &str) -> Result<SocialLink> {
        sqlx::query_as::<_, SocialLink>("SELECT * FROM social_links WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("social link", id.to_string()))
    }

    /// List footer links alphabetically by label
    pub async fn list_social_links(&self) -> Result<Vec<SocialLink>> {
        let links =
            sqlx::query_as::<_, SocialLink>("SELECT * FROM social_links ORDER BY label ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(links)
    }

    /// Update a footer link
    pub async fn update_social_link(
        &self,
        id: &str,
        req: UpdateSocialLinkRequest,
    ) -> Result<SocialLink> {
        let mut sets = Vec::new();
        let mut params = Vec::new();

        if let Some(label) = req.label {
            sets.push("label = ?");
            params.push(label);
        }
        if let Some(url) = req.url {
            sets.push("url = ?");
            params.push(url);
        }

        self.update_fields("social_links", "social link", id, &sets, params)
            .await?;
        self.get_social_link(id).await
    }

    /// Delete a footer link
    pub async fn delete_social_link(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM social_links WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("social link", id.to_string()));
        }

        tracing::debug!("Deleted social link: {}", id);
        Ok(())
    }

    // ===== Profile facts =====

    /// Create an about-section entry
    pub async fn create_profile_fact(&self, req: CreateProfileFactRequest) -> Result<ProfileFact> {
        let id = Uuid::new_v4().to_string();

        let fact = sqlx::query_as::<_, ProfileFact>(
            "INSERT INTO profile_facts (id, title, detail) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.detail)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created profile fact: {}", id);
        Ok(fact)
    }

    /// Get an about-section entry by ID
    pub async fn get_profile_fact(&self, id: &str) -> Result<ProfileFact> {
        sqlx::query_as::<_, ProfileFact>("SELECT * FROM profile_facts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("profile fact", id.to_string()))
    }

    /// List about-section entries alphabetically by title
    pub async fn list_profile_facts(&self) -> Result<Vec<ProfileFact>> {
        let facts =
            sqlx::query_as::<_, ProfileFact>("SELECT * FROM profile_facts ORDER BY title ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(facts)
    }

    /// Update an about-section entry
    pub async fn update_profile_fact(
        &self,
        id: &str,
        req: UpdateProfileFactRequest,
    ) -> Result<ProfileFact> {
        let mut sets = Vec::new();
        let mut params = Vec::new();

        if let Some(title) = req.title {
            sets.push("title = ?");
            params.push(title);
        }
        if let Some(detail) = req.detail {
            sets.push("detail = ?");
            params.push(detail);
        }

        self.update_fields("profile_facts", "profile fact", id, &sets, params)
            .await?;
        self.get_profile_fact(id).await
    }

    /// Delete an about-section entry
    pub async fn delete_profile_fact(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM profile_facts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound("profile fact", id.to_string()));
        }

        tracing::debug!("Deleted profile fact: {}", id);
        Ok(())
    }
}
