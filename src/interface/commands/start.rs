//! # Start Command
//!
//! Handles the `/start` command: greets the user and points them at `/help`.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::traits::{CommandHandler, Transport};
use crate::domain::types::InboundEvent;
use crate::strings;

pub struct StartCommand;

#[async_trait]
impl CommandHandler for StartCommand {
    async fn handle(&self, event: &InboundEvent, transport: &dyn Transport) -> Result<()> {
        transport
            .send_reply(event.chat(), strings::messages::START_GREETING)
            .await
    }
}
