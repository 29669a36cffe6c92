//! Router assembly
//!
//! Request path, outermost first: tracing, security headers, rate limiting,
//! origin guard, CORS, panic containment, body limit, then the route.
//! Panics are caught inside the header layers so their 500 is decorated
//! like any other response.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::ChatService;
use crate::config::IngressConfig;
use crate::error::AppError;
use crate::middleware::{
    cors_layer, handle_panic, origin_guard, rate_limit, security_headers, FixedWindowLimiter,
    OriginPolicy, RateLimitState,
};
use crate::routes;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = HealthCheck)),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "ShopNest chatbot is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn build_router(
    state: AppState,
    ingress: &IngressConfig,
    limiter: Arc<FixedWindowLimiter>,
) -> Router {
    let policy = Arc::new(OriginPolicy::from_config(ingress));
    let rate_limit_state = RateLimitState {
        limiter,
        trust_proxy: ingress.trust_proxy,
    };

    let api = routes::chat::router();

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", routes::swagger::ApiDoc::openapi()),
        )
        .route("/health", get(health_check))
        .merge(api.clone())
        .nest("/api/v2/chatbot", api)
        .fallback(|| async { AppError::NotFound })
        .with_state(state)
        .layer(DefaultBodyLimit::max(ingress.max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(policy.clone()))
        .layer(middleware::from_fn_with_state(policy, origin_guard))
        .layer(middleware::from_fn_with_state(rate_limit_state, rate_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
}
