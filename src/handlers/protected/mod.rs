// Player data handlers. Routed behind `api_key_middleware`.
pub mod player_get;
pub mod player_update;

pub use player_get::{player_get, player_get_update_id};
pub use player_update::player_update;

use axum::extract::Path;

use crate::error::ApiError;

/// The `:id` segment, or 400 when the route was hit without one
pub(crate) fn require_id(id: Option<Path<String>>) -> Result<String, ApiError> {
    match id {
        Some(Path(id)) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::missing_id()),
    }
}
