//! Owner-scoped song CRUD handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use setlist_common::model::{SequenceItem, Song};
use uuid::Uuid;

use crate::api::auth::CurrentUser;
use crate::db::songs;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    #[serde(default)]
    pub title: String,
    pub key: Option<String>,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub key: Option<String>,
    pub sequence: Option<Vec<SequenceItem>>,
}

/// GET /api/songs
pub async fn list_songs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Song>>> {
    let songs = songs::list_songs(&state.db, user.guid).await?;
    Ok(Json(songs))
}

/// POST /api/songs
///
/// The server assigns the next collection position.
pub async fn create_song(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateSongRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let song = songs::create_song(
        &state.db,
        user.guid,
        title,
        req.key.as_deref(),
        req.sequence,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(song)))
}

/// PUT /api/songs/:id
pub async fn update_song(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSongRequest>,
) -> ApiResult<Json<Song>> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("Title must not be empty".to_string()));
        }
    }

    let song = songs::update_song(
        &state.db,
        user.guid,
        id,
        songs::SongUpdate {
            title: req.title.map(|t| t.trim().to_string()),
            key: req.key,
            sequence: req.sequence,
        },
    )
    .await?;

    Ok(Json(song))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    songs::delete_song(&state.db, user.guid, id).await?;
    Ok(Json(json!({ "success": true })))
}
