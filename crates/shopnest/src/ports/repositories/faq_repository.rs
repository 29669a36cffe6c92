//! FAQ Repository Port
//!
//! Read-only access to the curated knowledge base.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, FaqEntry};

/// Repository interface for knowledge-base entries
#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// Find the first entry matching a normalized query.
    ///
    /// Matching follows [`FaqEntry::matches`]. When several entries match,
    /// the store's natural order decides. No match is `Ok(None)`.
    async fn find_matching(&self, query: &str) -> Result<Option<FaqEntry>, DomainError>;
}
