//! FaqEntry - Knowledge Base Entry
//!
//! Read-only to the chatbot; owned by the content store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A curated question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Case-insensitive containment in either direction.
    ///
    /// The query is literal text. An empty question or query never matches.
    pub fn matches(&self, query: &str) -> bool {
        let question = self.question.to_lowercase();
        let query = query.to_lowercase();
        if question.is_empty() || query.is_empty() {
            return false;
        }
        question.contains(&query) || query.contains(&question)
    }
}
