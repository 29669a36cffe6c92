//! ShopNest API Data Models
//!
//! - Chat: chatbot request/response
//! - Error: uniform error body

mod chat;

pub use chat::*;
