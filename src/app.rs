use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{api_key_middleware, rate_limit_middleware, security_headers};
use crate::state::AppState;

/// Full router: rate limiting on everything, API key on player data
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(player_routes(state.clone()))
        // Global middleware
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let router = security_headers(router);
    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

fn player_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Bare paths exist so a missing id is answered with 400, not 404
        .route("/v1/player-data/", get(protected::player_get))
        .route("/v1/player-data/:id", get(protected::player_get))
        // `update` is also a valid player id for GET
        .route(
            "/v1/player-data/update",
            get(protected::player_get_update_id).put(protected::player_update),
        )
        .route(
            "/v1/player-data/update/",
            get(protected::player_get_update_id).put(protected::player_update),
        )
        .route("/v1/player-data/update/:id", put(protected::player_update))
        .route_layer(from_fn_with_state(state, api_key_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let mut headers = vec![header::CONTENT_TYPE];
    if let Ok(name) = HeaderName::from_bytes(security.api_key_header.as_bytes()) {
        headers.push(name);
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::PUT])
            .allow_headers(AllowHeaders::list(headers)),
    )
}
