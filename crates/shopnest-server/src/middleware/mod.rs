//! Ingress Protection Layer
//!
//! Middleware applied ahead of every route:
//! - security headers on every response
//! - fixed-window rate limiting per client address
//! - origin allow-list (rejects) and CORS headers (decorates)
//! - panic containment

pub mod cors;
pub mod panic;
pub mod rate_limit;
pub mod security_headers;

pub use cors::{cors_layer, origin_guard, OriginPolicy};
pub use panic::handle_panic;
pub use rate_limit::{rate_limit, spawn_sweeper, FixedWindowLimiter, RateLimitState};
pub use security_headers::security_headers;
