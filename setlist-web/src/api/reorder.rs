//! Collection reorder endpoint

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use setlist_common::model::SongOrder;

use crate::api::auth::CurrentUser;
use crate::db::songs;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub songs: Vec<SongOrder>,
}

/// PUT /api/songs/reorder
///
/// Persists a full collection reorder via the two-phase renumbering
/// transaction. The batch is all-or-nothing: an id that does not belong
/// to the caller aborts it with nothing changed.
pub async fn reorder_songs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.songs.is_empty() {
        return Err(ApiError::BadRequest("Empty reorder batch".to_string()));
    }

    songs::reorder_songs(&state.db, user.guid, &req.songs).await?;

    Ok(Json(json!({ "success": true })))
}
