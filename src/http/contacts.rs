//! Contact message endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{Contact, CreateContactRequest, UpdateContactRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Contact>>> {
    Ok(Json(state.content.list_contacts().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>)> {
    let contact = state.content.create_contact(req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>> {
    Ok(Json(state.content.get_contact(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<Contact>> {
    Ok(Json(state.content.update_contact(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.content.delete_contact(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
