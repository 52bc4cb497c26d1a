//! # Command Router
//!
//! Routes one inbound event to the handler registered for its command name
//! and invokes it through the retry executor. Unregistered commands are
//! dropped without touching the retry layer; an exhausted retry propagates
//! to the caller untouched.

use anyhow::Result;
use std::sync::Arc;

use crate::application::registry::CommandRegistry;
use crate::application::retry::RetryExecutor;
use crate::domain::traits::Transport;
use crate::domain::types::InboundEvent;

pub struct CommandRouter {
    registry: CommandRegistry,
    retry: RetryExecutor,
    transport: Arc<dyn Transport>,
}

impl CommandRouter {
    pub fn new(registry: CommandRegistry, retry: RetryExecutor, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            retry,
            transport,
        }
    }

    /// Dispatch one event.
    ///
    /// Returns `Ok(())` both on handler success and for unknown commands.
    /// The only error that escapes is a handler failure that survived every
    /// retry attempt; the polling loop decides what that means for the
    /// process.
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<()> {
        let cmd = event.command();
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' chat={}",
            cmd,
            event.payload(),
            event.chat().chat_id
        );

        let Some(handler) = self.registry.resolve(cmd) else {
            tracing::debug!("No handler registered for '{}', dropping event", cmd);
            return Ok(());
        };

        self.retry
            .execute(cmd, || handler.handle(event, self.transport.as_ref()))
            .await
    }
}
