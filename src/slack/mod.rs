//! All Slack-specific functionality

pub mod client;
pub mod events;
pub mod message_formatter;

// Re-export main types for convenience
pub use client::{MessageSink, SlackClient};
pub use events::ChatEvent;
pub use message_formatter::{FormatOptions, MESSAGE_CHAR_LIMIT, format_reply};
