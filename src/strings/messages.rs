//! # Messages
//!
//! Constant strings for user-facing replies.

pub const START_GREETING: &str = "Hi! I'm a bot. Use /help to see the available commands.";
