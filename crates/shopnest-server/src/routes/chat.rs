//! Chat Routes - Customer question answering
//!
//! HTTP handler that delegates to ChatService.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse};

/// Answer a customer question
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer from the knowledge base or the AI provider", body = ChatResponse),
        (status = 400, description = "Message is missing or blank", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Chat pipeline failure", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    // an unreadable body is treated the same as a missing message
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!("Unreadable chat body: {}", rejection.body_text());
            ChatRequest::default()
        }
    };

    let reply = state
        .chat_service
        .handle(request.message.as_deref())
        .await
        .map_err(|e| {
            if !matches!(e, shopnest::DomainError::InvalidInput(_)) {
                tracing::error!("Error processing chatbot request: {}", e);
            }
            AppError::from(e)
        })?;

    Ok(Json(ChatResponse {
        faq_response: reply.faq_response,
        ai_response: reply.ai_response,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}
