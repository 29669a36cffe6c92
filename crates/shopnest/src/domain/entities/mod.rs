//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - FaqEntry: Curated knowledge-base question/answer pair
//! - ConversationRecord: Durable log of one handled exchange
//! - PlatformInfo: Static platform facts used to ground prompts

mod conversation;
mod faq;
mod platform;

pub use conversation::*;
pub use faq::*;
pub use platform::*;
