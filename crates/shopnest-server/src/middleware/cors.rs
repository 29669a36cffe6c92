//! Origin policy
//!
//! `origin_guard` rejects requests whose `Origin` is not allowed before they
//! reach a handler; `cors_layer` adds CORS response headers for allowed ones.
//! Requests without an `Origin` header (same-origin, curl) pass through.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{config::IngressConfig, error::AppError};

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
    pattern: Option<Regex>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>, pattern: Option<Regex>) -> Self {
        Self { allowed, pattern }
    }

    pub fn from_config(config: &IngressConfig) -> Self {
        Self::new(config.allowed_origins.clone(), config.origin_pattern.clone())
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.iter().any(|o| o == origin)
            || self.pattern.as_ref().is_some_and(|p| p.is_match(origin))
    }
}

pub async fn origin_guard(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let rejected = match request.headers().get(header::ORIGIN) {
        None => None,
        Some(origin) => match origin.to_str() {
            Ok(o) if policy.is_allowed(o) => None,
            _ => Some(origin.clone()),
        },
    };

    if let Some(origin) = rejected {
        tracing::warn!(origin = ?origin, "Rejected request from disallowed origin");
        return AppError::ForbiddenOrigin.into_response();
    }

    next.run(request).await
}

pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|o| policy.is_allowed(o))
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}
