//! Category endpoints
//!
//! Duplicate names and deleting a category that still has documents both
//! come back as 409 via the error mapping.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.content.list_categories().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.content.create_category(&req.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    Ok(Json(state.content.get_category(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    Ok(Json(state.content.rename_category(&id, &req.name).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.content.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
