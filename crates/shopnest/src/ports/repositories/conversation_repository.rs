//! Conversation Repository Port
//!
//! Write-once log of handled chat exchanges.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ConversationRecord};

/// Repository interface for conversation records
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert a record. Never updates or deduplicates.
    ///
    /// Failures are reported as [`DomainError::Persistence`].
    async fn record(&self, record: &ConversationRecord) -> Result<ConversationRecord, DomainError>;
}
