//! # Help Text
//!
//! The main help menu shown by the `/help` command.

pub const MAIN: &str = "\
Available commands:
/start - Start talking to the bot
/help - Show this help";
