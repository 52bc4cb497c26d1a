//! # Command Registry
//!
//! Static mapping from command name to handler. Populated once at startup,
//! read-only once the polling loop starts, so lookups need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::traits::CommandHandler;

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `name`. Registering the same name twice replaces
    /// the earlier handler; one handler per command name.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Look up the handler for `name`. `None` for unregistered commands;
    /// never a default handler, never an error.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
