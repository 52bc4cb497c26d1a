//! # Help Command
//!
//! Handles the `/help` command: lists the available commands.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::traits::{CommandHandler, Transport};
use crate::domain::types::InboundEvent;
use crate::strings;

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, event: &InboundEvent, transport: &dyn Transport) -> Result<()> {
        transport
            .send_reply(event.chat(), strings::help::MAIN)
            .await
    }
}
