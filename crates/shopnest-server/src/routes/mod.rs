//! ShopNest API Routes
//!
//! - /chat - Chatbot question answering
//! - /api/v2/chatbot/chat - Same handler under the versioned prefix

pub mod chat;
pub mod swagger;
