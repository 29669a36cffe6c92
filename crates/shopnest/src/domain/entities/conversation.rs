//! ConversationRecord - Durable Chat Log
//!
//! Written once per handled request, never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which source produced the bot response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Matched a curated knowledge-base entry
    KnowledgeBase,
    /// Answered by the completion provider
    Provider,
    /// Provider failed or returned nothing; canned answer used
    Fallback,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::KnowledgeBase => write!(f, "knowledge_base"),
            AnswerSource::Provider => write!(f, "provider"),
            AnswerSource::Fallback => write!(f, "fallback"),
        }
    }
}

impl std::str::FromStr for AnswerSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "knowledge_base" => Ok(AnswerSource::KnowledgeBase),
            "provider" => Ok(AnswerSource::Provider),
            "fallback" => Ok(AnswerSource::Fallback),
            _ => Err(format!("Unknown answer source: {}", s)),
        }
    }
}

/// One question/answer exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: Uuid,
    /// The message as the user sent it, with NUL characters replaced
    pub user_message: String,
    pub bot_response: String,
    pub answer_source: AnswerSource,
    pub created_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(
        user_message: impl Into<String>,
        bot_response: impl Into<String>,
        answer_source: AnswerSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_message: storable(user_message.into()),
            bot_response: storable(bot_response.into()),
            answer_source,
            created_at: Utc::now(),
        }
    }
}

/// Text columns cannot hold NUL
fn storable(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "\u{FFFD}")
    } else {
        text
    }
}
