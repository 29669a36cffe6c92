//! ShopNest Chatbot Domain Library
//!
//! Core domain types and interfaces for the ShopNest customer chatbot.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (FaqEntry, ConversationRecord, PlatformInfo)
//!   - `services/`: Message normalization and prompt building
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Knowledge base and conversation log
//!   - `services/`: Completion provider
//!
//! # Usage
//!
//! ```rust,ignore
//! use shopnest::domain::{FaqEntry, PromptBuilder};
//! use shopnest::ports::{CompletionProvider, FaqRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    build_prompt, normalize_message, require_message, AnswerSource, ConversationRecord,
    DomainError, FaqEntry, PlatformInfo, PromptBuilder, PromptLimits, MESSAGE_REQUIRED,
};
pub use ports::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionResponse,
    ConversationRepository, FaqRepository, MessageRole, TokenUsage,
};
