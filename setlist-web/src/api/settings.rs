//! Editor tunables endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// Quiet period before a debounced sequence save fires
    pub save_debounce_ms: i64,
}

/// GET /api/settings
///
/// Publishes server-side tunables so every client coalesces writes over
/// the same window.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsResponse>> {
    let save_debounce_ms =
        setlist_common::db::get_setting_i64(&state.db, "editor_save_debounce_ms", 5000).await?;

    Ok(Json(SettingsResponse { save_debounce_ms }))
}
