//! Documents service
//!
//! The upload pipeline: allow-list check, filename sanitization, and
//! dispatch to the configured storage strategy (disk or database blob).
//! Also supplies the category choices the document form's dropdown shows.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{Config, UploadStorage};
use crate::database::{
    Document, DocumentWithCategory, Repository, StoredDocumentFile, UpdateDocumentRequest,
};
use crate::error::{AppError, Result};
use crate::storage::{content_hash, UploadStore};

/// A file received from a multipart upload
#[derive(Debug)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A category choice for the document form's dropdown
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

/// A document listing row, with the public URL for disk-stored files
#[derive(Debug, Serialize)]
pub struct DocumentListing {
    #[serde(flatten)]
    pub document: DocumentWithCategory,
    /// URL under the static prefix for disk-stored rows, None for
    /// blob-stored rows
    pub public_url: Option<String>,
}

/// Service for managing uploaded documents
#[derive(Clone)]
pub struct DocumentsService {
    repo: Repository,
    store: UploadStore,
    config: Arc<Config>,
}

impl DocumentsService {
    pub fn new(repo: Repository, store: UploadStore, config: Arc<Config>) -> Self {
        Self {
            repo,
            store,
            config,
        }
    }

    /// Accept an upload and create its document row.
    ///
    /// The pipeline: reject unusable uploads, check the extension
    /// allow-list, sanitize the filename, verify the category, then place
    /// the bytes per the configured storage strategy.
    pub async fn upload(&self, category_id: &str, upload: FileUpload) -> Result<Document> {
        tracing::info!(
            "Uploading document: {} ({} bytes)",
            upload.filename,
            upload.data.len()
        );

        let file = self.prepare(category_id, upload).await?;
        let document = self.repo.create_document(category_id, file).await?;

        tracing::info!("Document created: {}", document.id);
        Ok(document)
    }

    /// Get a document row by ID
    pub async fn get(&self, id: &str) -> Result<Document> {
        self.repo.get_document(id).await
    }

    /// List documents with category names and public URLs, newest first
    pub async fn list(&self) -> Result<Vec<DocumentListing>> {
        let documents = self.repo.list_documents().await?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let public_url = self.stored_url(document.stored_path.as_deref());
                DocumentListing {
                    document,
                    public_url,
                }
            })
            .collect())
    }

    /// Fetch a document and its bytes from whichever storage holds them
    pub async fn open(&self, id: &str) -> Result<(Document, Vec<u8>)> {
        let document = self.repo.get_document(id).await?;

        let data = match &document.stored_path {
            Some(path) => self.store.read(path).await?,
            None => self.repo.read_document_blob(id).await?,
        };

        Ok((document, data))
    }

    /// Metadata-only edit: display filename and/or category
    pub async fn update(&self, id: &str, mut req: UpdateDocumentRequest) -> Result<Document> {
        if let Some(filename) = req.filename.take() {
            let safe = sanitize_filename(&filename);
            if safe.is_empty() {
                return Err(AppError::InvalidInput("filename must not be empty".into()));
            }
            req.filename = Some(safe);
        }

        if let Some(category_id) = &req.category_id {
            self.repo.get_category(category_id).await?;
        }

        self.repo.update_document(id, req).await
    }

    /// Swap a document's content for a re-uploaded file.
    ///
    /// Runs the same validation pipeline as a fresh upload, then releases
    /// the previously stored disk bytes if no other document shares them.
    pub async fn replace_file(&self, id: &str, upload: FileUpload) -> Result<Document> {
        tracing::info!("Replacing file for document: {}", id);

        let previous = self.repo.get_document(id).await?;
        let file = self.prepare(&previous.category_id, upload).await?;
        let replaced_path = file.stored_path.clone();

        let document = self.repo.replace_document_file(id, file).await?;

        if let Some(old_path) = previous.stored_path {
            if replaced_path.as_deref() != Some(old_path.as_str()) {
                self.release_if_unreferenced(&old_path).await?;
            }
        }

        Ok(document)
    }

    /// Delete a document, releasing its disk bytes when it was the last
    /// row referencing them
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting document: {}", id);

        let stored_path = self.repo.delete_document(id).await?;

        if let Some(path) = stored_path {
            self.release_if_unreferenced(&path).await?;
        }

        Ok(())
    }

    /// Category choices for the document form. Empty when no categories
    /// exist yet; the form simply renders an empty dropdown.
    pub async fn form_options(&self) -> Result<Vec<CategoryOption>> {
        let categories = self.repo.list_categories().await?;

        Ok(categories
            .into_iter()
            .map(|c| CategoryOption {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    /// Public URL for a document's stored file, None when blob-stored
    pub fn public_url(&self, document: &Document) -> Option<String> {
        self.stored_url(document.stored_path.as_deref())
    }

    fn stored_url(&self, stored_path: Option<&str>) -> Option<String> {
        stored_path.map(|path| UploadStore::public_url(&self.config.static_prefix, path))
    }

    /// Validate an upload and resolve it to storage-ready fields
    async fn prepare(&self, category_id: &str, upload: FileUpload) -> Result<StoredDocumentFile> {
        if upload.filename.trim().is_empty() || upload.data.is_empty() {
            return Err(AppError::MissingFile);
        }

        if !self.config.allowed_file(&upload.filename) {
            let extension = upload
                .filename
                .rsplit_once('.')
                .map(|(_, ext)| ext)
                .unwrap_or(&upload.filename);
            return Err(AppError::InvalidFileType(extension.to_ascii_lowercase()));
        }

        let filename = sanitize_filename(&upload.filename);
        if filename.is_empty() {
            return Err(AppError::InvalidInput("filename must not be empty".into()));
        }

        // FK errors out of the insert would be 500s; check up front
        self.repo.get_category(category_id).await?;

        let file = match self.config.upload_storage {
            UploadStorage::Disk => {
                let stored = self.store.store(&upload.data).await?;
                StoredDocumentFile {
                    filename,
                    content_type: upload.content_type,
                    size_bytes: stored.size_bytes,
                    sha256: stored.sha256,
                    stored_path: Some(stored.relative_path),
                    blob: None,
                }
            }
            UploadStorage::Database => StoredDocumentFile {
                filename,
                content_type: upload.content_type,
                size_bytes: upload.data.len() as i64,
                sha256: content_hash(&upload.data),
                stored_path: None,
                blob: Some(upload.data),
            },
        };

        Ok(file)
    }

    /// Remove a disk file once no document row references its path.
    /// Content addressing can share one file between documents.
    async fn release_if_unreferenced(&self, stored_path: &str) -> Result<()> {
        let references = self.repo.count_documents_with_path(stored_path).await?;

        if references == 0 {
            self.store.remove(stored_path).await?;
        }

        Ok(())
    }
}

/// Sanitize a filename: strip path separators and NUL bytes, cap length
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(crate::config::MAX_FILENAME_LENGTH)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir, storage: UploadStorage) -> Config {
        Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            data_dir: temp.path().to_path_buf(),
            database_path: temp.path().join("folio.db"),
            uploads_dir: temp.path().join("uploads"),
            upload_storage: storage,
            static_prefix: "/static/uploads".to_string(),
            allowed_extensions: ["pdf", "png"].iter().map(|e| e.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    async fn create_test_service(storage: UploadStorage) -> (DocumentsService, TempDir) {
        let temp = TempDir::new().unwrap();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_database(&pool).await.unwrap();
        let repo = Repository::new(pool);

        let store = UploadStore::new(temp.path().join("uploads"));
        store.initialize().await.unwrap();

        let config = Arc::new(test_config(&temp, storage));

        (DocumentsService::new(repo, store, config), temp)
    }

    fn pdf_upload(filename: &str, data: &[u8]) -> FileUpload {
        FileUpload {
            filename: filename.to_string(),
            content_type: "application/pdf".to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_disk_upload_round_trip() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();
        let document = service
            .upload(&category.id, pdf_upload("annual.pdf", b"%PDF bytes"))
            .await
            .unwrap();

        assert!(document.stored_path.is_some());
        assert_eq!(
            service.public_url(&document).unwrap(),
            format!("/static/uploads/{}", document.stored_path.as_ref().unwrap())
        );

        let (opened, data) = service.open(&document.id).await.unwrap();
        assert_eq!(opened.filename, "annual.pdf");
        assert_eq!(data, b"%PDF bytes");
    }

    #[tokio::test]
    async fn test_database_upload_round_trip() {
        let (service, _temp) = create_test_service(UploadStorage::Database).await;

        let category = service.repo.create_category("Reports").await.unwrap();
        let document = service
            .upload(&category.id, pdf_upload("annual.pdf", b"%PDF bytes"))
            .await
            .unwrap();

        assert!(document.stored_path.is_none());
        assert!(service.public_url(&document).is_none());

        let (_, data) = service.open(&document.id).await.unwrap();
        assert_eq!(data, b"%PDF bytes");
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();

        let result = service
            .upload(&category.id, pdf_upload("script.exe", b"MZ"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidFileType(ext)) if ext == "exe"));

        let result = service
            .upload(&category.id, pdf_upload("no_extension", b"data"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidFileType(_))));
    }

    #[tokio::test]
    async fn test_empty_upload_is_missing_file() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();

        let result = service.upload(&category.id, pdf_upload("", b"data")).await;
        assert!(matches!(result, Err(AppError::MissingFile)));

        let result = service
            .upload(&category.id, pdf_upload("empty.pdf", b""))
            .await;
        assert!(matches!(result, Err(AppError::MissingFile)));
    }

    #[tokio::test]
    async fn test_filename_sanitized() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();
        let document = service
            .upload(&category.id, pdf_upload("../../../etc/evil.pdf", b"data"))
            .await
            .unwrap();

        assert_eq!(document.filename, "......etcevil.pdf");
        assert!(!document.filename.contains('/'));
    }

    #[tokio::test]
    async fn test_upload_to_missing_category() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        let result = service
            .upload("nope", pdf_upload("annual.pdf", b"data"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound("category", _))));
    }

    #[tokio::test]
    async fn test_delete_keeps_shared_disk_file() {
        let (service, temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();

        // Two documents, same bytes: one disk file
        let first = service
            .upload(&category.id, pdf_upload("a.pdf", b"shared"))
            .await
            .unwrap();
        let second = service
            .upload(&category.id, pdf_upload("copy-of-a.pdf", b"shared"))
            .await
            .unwrap();

        let path = first.stored_path.clone().unwrap();
        assert_eq!(second.stored_path.as_deref(), Some(path.as_str()));

        let on_disk = temp.path().join("uploads").join(&path);

        service.delete(&first.id).await.unwrap();
        assert!(on_disk.exists());

        service.delete(&second.id).await.unwrap();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_replace_file_releases_old_bytes() {
        let (service, temp) = create_test_service(UploadStorage::Disk).await;

        let category = service.repo.create_category("Reports").await.unwrap();
        let document = service
            .upload(&category.id, pdf_upload("v1.pdf", b"first version"))
            .await
            .unwrap();

        let old_path = temp
            .path()
            .join("uploads")
            .join(document.stored_path.as_ref().unwrap());
        assert!(old_path.exists());

        let replaced = service
            .replace_file(&document.id, pdf_upload("v2.pdf", b"second version"))
            .await
            .unwrap();

        assert_eq!(replaced.filename, "v2.pdf");
        assert_ne!(replaced.stored_path, document.stored_path);
        assert!(!old_path.exists());

        let (_, data) = service.open(&document.id).await.unwrap();
        assert_eq!(data, b"second version");
    }

    #[tokio::test]
    async fn test_form_options_follow_categories() {
        let (service, _temp) = create_test_service(UploadStorage::Disk).await;

        // No categories: empty dropdown
        assert!(service.form_options().await.unwrap().is_empty());

        service.repo.create_category("Slides").await.unwrap();
        service.repo.create_category("Papers").await.unwrap();

        let names: Vec<String> = service
            .form_options()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Papers", "Slides"]);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("normal.pdf"), "normal.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("file\\name.pdf"), "filename.pdf");
        assert_eq!(sanitize_filename("  \0 "), "");
    }
}
