//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod chat_service;

pub use chat_service::ChatService;

#[cfg(test)]
pub use chat_service::FALLBACK_ANSWER;
