//! PostgreSQL Repository Implementations

mod conversation_repository;
mod faq_repository;

pub use conversation_repository::PgConversationRepository;
pub use faq_repository::PgFaqRepository;
