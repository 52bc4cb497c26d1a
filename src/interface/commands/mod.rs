//! # Command Handlers
//!
//! One module per command. `default_registry` wires up everything the bot
//! responds to; registration happens once here, before the polling loop
//! starts.

pub mod help;
pub mod start;

use std::sync::Arc;

use crate::application::registry::CommandRegistry;

pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register("start", Arc::new(start::StartCommand));
    registry.register("help", Arc::new(help::HelpCommand));
    registry
}
