//! Chat request/response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chat request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The customer's question
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response. Exactly one field is non-null on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Answer from the curated knowledge base
    pub faq_response: Option<String>,
    /// Answer from the completion provider (or the canned fallback)
    pub ai_response: Option<String>,
}

/// Error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
