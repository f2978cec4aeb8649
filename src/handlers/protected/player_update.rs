use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::require_id;
use crate::database::models::PlayerUpdate;
use crate::error::ApiError;
use crate::state::AppState;

/// PUT /v1/player-data/update/:id - overwrite points, inventory and challenges.
///
/// Succeeds even when no row matches `id`; rows are never created here.
pub async fn player_update(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    body: Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = require_id(id)?;

    let Json(update) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(rejection.body_text())
        } else {
            ApiError::invalid_json(rejection.body_text())
        }
    })?;

    state
        .store
        .update_player(&id, &update)
        .await
        .map_err(|e| ApiError::backend(&e, state.config.security.expose_backend_errors))?;

    Ok(Json(json!({ "status": "success" })))
}
