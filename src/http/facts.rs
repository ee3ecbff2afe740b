//! Profile fact endpoints (titled about-section entries)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{CreateProfileFactRequest, ProfileFact, UpdateProfileFactRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProfileFact>>> {
    Ok(Json(state.content.list_profile_facts().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileFactRequest>,
) -> Result<(StatusCode, Json<ProfileFact>)> {
    let fact = state.content.create_profile_fact(req).await?;
    Ok((StatusCode::CREATED, Json(fact)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileFact>> {
    Ok(Json(state.content.get_profile_fact(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileFactRequest>,
) -> Result<Json<ProfileFact>> {
    Ok(Json(state.content.update_profile_fact(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.content.delete_profile_fact(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
