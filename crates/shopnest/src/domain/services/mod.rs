//! Domain Services
//!
//! Stateless operations over domain entities.

mod message;
mod prompt;

pub use message::*;
pub use prompt::*;
