use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of counting one request against its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32, reset_after: Duration },
    Limited { retry_after: Duration },
}

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identifier
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count a request for `key` and decide whether it may proceed
    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().await;

        let entry = windows.entry(key.to_string()).or_insert(Window { started: now, count: 0 });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        entry.count = entry.count.saturating_add(1);
        let reset_after = self.window.saturating_sub(now.saturating_duration_since(entry.started));

        if entry.count > self.max_requests {
            RateDecision::Limited { retry_after: reset_after }
        } else {
            RateDecision::Allowed {
                remaining: self.max_requests - entry.count,
                reset_after,
            }
        }
    }

    /// Drop windows that have expired; returns how many were removed
    pub async fn sweep_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - windows.len()
    }

    #[cfg(test)]
    pub(crate) async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Periodically evict expired windows so idle clients don't accumulate
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep_at(Instant::now()).await;
                if removed > 0 {
                    debug!("Rate limiter evicted {} expired windows", removed);
                }
            }
        })
    }
}

/// Counts every request per client; key holders skip counting entirely.
///
/// Counted responses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
/// `X-RateLimit-Reset` (unix seconds when the window ends).
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let security = &state.config.security;
    let ctx = RequestContext::from_request(&request, security);

    if ctx.presents_key(&security.api_key) {
        return next.run(request).await;
    }

    let limit = state.limiter.max_requests();
    match state.limiter.check(ctx.client_key()).await {
        RateDecision::Allowed { remaining, reset_after } => {
            let mut response = next.run(request).await;
            set_limit_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!("Rate limit exceeded for {}", ctx.client_key());
            let mut response = ApiError::too_many_requests(ceil_secs(retry_after).max(1)).into_response();
            set_limit_headers(response.headers_mut(), limit, 0, retry_after);
            response
        }
    }
}

// Round up so clients never retry inside the same window
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn set_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    let reset_at = chrono::Utc::now().timestamp().max(0) as u64 + ceil_secs(reset_after);
    headers.insert(LIMIT_HEADER, HeaderValue::from(limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(reset_at));
}
