//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod conversation_repository;
mod faq_repository;

pub use conversation_repository::*;
pub use faq_repository::*;
