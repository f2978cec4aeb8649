use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Static API-key check for the player data routes
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let security = &state.config.security;
    let ctx = RequestContext::from_request(&request, security);

    if !ctx.presents_key(&security.api_key) {
        tracing::warn!(
            "Rejected {} {} from {}: invalid API key",
            request.method(),
            request.uri().path(),
            ctx.client_key()
        );
        return Err(ApiError::invalid_api_key());
    }

    Ok(next.run(request).await)
}
