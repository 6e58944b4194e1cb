//! Dengue assistant chat
//!
//! Builds a prompt from the system context, an optional client-supplied risk
//! assessment and the recent conversation, then delegates to a text
//! generator. Generation failures become an apology, never a crash.

pub mod history;
pub mod prompt;
pub mod service;

pub use history::{truncate_history, ConversationHistory};
pub use prompt::build_prompt;
pub use service::{ChatFailure, ChatService, NOT_CONFIGURED_MESSAGE};

/// Entries retained across turns (five exchanges)
pub const MAX_HISTORY_ENTRIES: usize = 10;
