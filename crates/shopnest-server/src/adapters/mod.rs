//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod openrouter;
pub mod postgres;

// Re-exports
pub use openrouter::OpenRouterProvider;
pub use postgres::{PgConversationRepository, PgFaqRepository};
