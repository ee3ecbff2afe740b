//! Footer link endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{CreateSocialLinkRequest, SocialLink, UpdateSocialLinkRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SocialLink>>> {
    Ok(Json(state.content.list_social_links().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSocialLinkRequest>,
) -> Result<(StatusCode, Json<SocialLink>)> {
    let link = state.content.create_social_link(req).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SocialLink>> {
    Ok(Json(state.content.get_social_link(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSocialLinkRequest>,
) -> Result<Json<SocialLink>> {
    Ok(Json(state.content.update_social_link(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.content.delete_social_link(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
