use axum::{
    extract::{Path, State},
    Json,
};

use super::require_id;
use crate::database::models::PlayerRecord;
use crate::error::ApiError;
use crate::state::AppState;

/// Id segment claimed by the static `update/` branch of the router
const UPDATE_SEGMENT: &str = "update";

/// GET /v1/player-data/:id - points, challenges and inventory for one player
pub async fn player_get(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let id = require_id(id)?;
    find_player(&state, &id).await
}

/// GET /v1/player-data/update - the static update path shadows `:id`, so the
/// player whose id is literally `update` is looked up here
pub async fn player_get_update_id(State(state): State<AppState>) -> Result<Json<PlayerRecord>, ApiError> {
    find_player(&state, UPDATE_SEGMENT).await
}

async fn find_player(state: &AppState, id: &str) -> Result<Json<PlayerRecord>, ApiError> {
    match state.store.find_player(id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::not_found("User not found")),
        Err(e) => Err(ApiError::backend(&e, state.config.security.expose_backend_errors)),
    }
}
