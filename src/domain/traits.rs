//! # Domain Traits
//!
//! Abstract interfaces for the core collaborators (Transport, CommandHandler).
//! Allows for pluggable implementations in the Infrastructure layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::types::{ChatContext, InboundEvent};

/// Abstract interface for the messaging transport (e.g. Telegram, Console).
///
/// The core only needs two capabilities from the platform: pull the next
/// batch of inbound command events, and push a reply back to a chat.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the next batch of inbound events.
    ///
    /// May block for a long time (long polling). An empty batch is a normal
    /// outcome when the poll times out without new messages.
    async fn next_events(&self) -> Result<Vec<InboundEvent>>;

    /// Send a text reply to a chat. Fire-and-forget from the core's view.
    async fn send_reply(&self, chat: ChatContext, text: &str) -> Result<()>;
}

/// The unit of business logic bound to one command name.
///
/// Handlers may be invoked more than once for the same event when the retry
/// layer re-attempts a failed invocation. Implementations must be safe to
/// call repeatedly; no exactly-once guarantee is provided.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Process one event. Any error makes the invocation eligible for retry.
    async fn handle(&self, event: &InboundEvent, transport: &dyn Transport) -> Result<()>;
}
