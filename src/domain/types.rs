//! # Domain Types
//!
//! Core value types shared across the application layers.

/// Identifies the chat a message arrived from, so a handler can reply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatContext {
    pub chat_id: i64,
}

impl ChatContext {
    pub fn new(chat_id: i64) -> Self {
        Self { chat_id }
    }
}

/// One received command message from the messaging channel.
///
/// Produced by the transport, consumed exactly once by the router.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    command: String,
    payload: String,
    chat: ChatContext,
}

impl InboundEvent {
    pub fn new(command: impl Into<String>, payload: impl Into<String>, chat: ChatContext) -> Self {
        Self {
            command: command.into(),
            payload: payload.into(),
            chat,
        }
    }

    /// Command name without any leading slash, e.g. `start` for `/start`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The rest of the message text after the command name. May be empty.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn chat(&self) -> ChatContext {
        self.chat
    }
}
