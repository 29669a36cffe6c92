//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::app::HealthCheck;
use crate::models::{ChatRequest, ChatResponse, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::app::health_check,
        super::chat::chat,
    ),
    info(
        title = "ShopNest Chatbot API",
        version = "0.1.0",
        description = "Customer-support chatbot for the ShopNest marketplace.\n\nAnswers from the curated FAQ knowledge base first, then from an AI completion provider grounded in platform facts.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Chat", description = "Chat - Customer question answering"),
    ),
    components(
        schemas(
            HealthCheck,
            ChatRequest,
            ChatResponse,
            ErrorResponse,
        )
    ),
)]
pub struct ApiDoc;
