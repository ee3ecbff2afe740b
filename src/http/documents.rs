//! Document endpoints
//!
//! Uploads arrive as multipart/form-data with a `file` part and a
//! `category_id` field, matching what the admin form submits. Downloads
//! come back with the stored content type and the display filename in a
//! Content-Disposition header.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::database::{Document, UpdateDocumentRequest};
use crate::error::{AppError, Result};
use crate::services::{CategoryOption, DocumentListing, FileUpload};

/// Payload of the form-support endpoint: the dropdown choices
#[derive(Serialize)]
pub struct FormOptions {
    pub categories: Vec<CategoryOption>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DocumentListing>>> {
    Ok(Json(state.documents.list().await?))
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Document>)> {
    let (category_id, file) = read_upload_form(multipart).await?;

    let category_id = category_id
        .ok_or_else(|| AppError::InvalidInput("category_id field is required".into()))?;
    let file = file.ok_or(AppError::MissingFile)?;

    let document = state.documents.upload(&category_id, file).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Dropdown choices for the document form
pub async fn form(State(state): State<AppState>) -> Result<Json<FormOptions>> {
    Ok(Json(FormOptions {
        categories: state.documents.form_options().await?,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>> {
    Ok(Json(state.documents.get(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>> {
    Ok(Json(state.documents.update(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.documents.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-upload on edit: replaces the stored bytes, keeps the row
pub async fn replace_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Document>> {
    let (_, file) = read_upload_form(multipart).await?;
    let file = file.ok_or(AppError::MissingFile)?;

    Ok(Json(state.documents.replace_file(&id, file).await?))
}

/// Download the stored bytes, whichever storage strategy holds them
pub async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let (document, data) = state.documents.open(&id).await?;

    let headers = [
        (header::CONTENT_TYPE, document.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];

    Ok((headers, data).into_response())
}

/// Pull the `file` part and `category_id` field out of a multipart body.
/// Either may be absent; the callers decide what is required.
async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<FileUpload>)> {
    let mut category_id = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;

                file = Some(FileUpload {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some("category_id") => {
                category_id = Some(field.text().await.map_err(bad_multipart)?);
            }
            _ => {}
        }
    }

    Ok((category_id, file))
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::InvalidInput(format!("invalid multipart body: {err}"))
}
