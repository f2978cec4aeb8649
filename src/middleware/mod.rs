pub mod auth;
pub mod context;
pub mod rate_limit;
pub mod security_headers;

pub use auth::api_key_middleware;
pub use context::RequestContext;
pub use rate_limit::{rate_limit_middleware, RateDecision, RateLimiter};
pub use security_headers::security_headers;
