//! Page profile endpoints (the page text/metadata record)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{CreatePageProfileRequest, PageProfile, UpdatePageProfileRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PageProfile>>> {
    Ok(Json(state.content.list_page_profiles().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePageProfileRequest>,
) -> Result<(StatusCode, Json<PageProfile>)> {
    let profile = state.content.create_page_profile(req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PageProfile>> {
    Ok(Json(state.content.get_page_profile(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePageProfileRequest>,
) -> Result<Json<PageProfile>> {
    Ok(Json(state.content.update_page_profile(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.content.delete_page_profile(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
