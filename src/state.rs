use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::database::PlayerStore;
use crate::middleware::RateLimiter;

/// Shared application state available to handlers and middleware via `State<AppState>`.
///
/// Cheap to clone; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn PlayerStore>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PlayerStore>) -> Self {
        let limiter = RateLimiter::new(
            config.api.rate_limit_requests,
            Duration::from_secs(config.api.rate_limit_window_secs),
        );

        Self {
            config: Arc::new(config),
            store,
            limiter: Arc::new(limiter),
        }
    }
}
