//! # Telegram Transport Adapter
//!
//! Implements the `Transport` trait against the Telegram Bot API over HTTP.
//! This module is the bridge between the generic `Transport` interface used
//! by the bot's core logic and the Bot API wire format: `getUpdates` long
//! polling for inbound messages, `sendMessage` for replies.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::domain::traits::Transport;
use crate::domain::types::{ChatContext, InboundEvent};

const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramTransport {
    http: reqwest::Client,
    base_url: String,
    poll_timeout_secs: u64,
    /// Next update_id to request; advances past every update we have seen,
    /// including non-command ones, so nothing is redelivered.
    offset: AtomicI64,
}

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

impl TelegramTransport {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self> {
        // The HTTP timeout must outlast the long poll itself.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: format!("{API_BASE}/bot{token}"),
            poll_timeout_secs,
            offset: AtomicI64::new(0),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram API request '{method}' failed"))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Telegram API response for '{method}' was not valid JSON"))?;

        if !envelope.ok {
            let reason = envelope.description.unwrap_or_else(|| "unknown error".to_string());
            bail!("Telegram API '{method}' returned an error: {reason}");
        }
        envelope
            .result
            .with_context(|| format!("Telegram API '{method}' returned ok without a result"))
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn next_events(&self) -> Result<Vec<InboundEvent>> {
        let body = serde_json::json!({
            "timeout": self.poll_timeout_secs,
            "offset": self.offset.load(Ordering::SeqCst),
            "allowed_updates": ["message"],
        });
        let updates: Vec<Update> = self.call("getUpdates", &body).await?;

        let mut events = Vec::new();
        for update in updates {
            self.offset.store(update.update_id + 1, Ordering::SeqCst);

            let Some(message) = update.message else { continue };
            let Some(text) = message.text.as_deref() else { continue };
            let Some((command, payload)) = parse_command(text) else {
                tracing::debug!("Ignoring non-command message in chat {}", message.chat.id);
                continue;
            };

            events.push(InboundEvent::new(
                command,
                payload,
                ChatContext::new(message.chat.id),
            ));
        }
        Ok(events)
    }

    async fn send_reply(&self, chat: ChatContext, text: &str) -> Result<()> {
        tracing::info!("Bot sending message to chat {}: {}", chat.chat_id, text);
        let body = serde_json::json!({
            "chat_id": chat.chat_id,
            "text": text,
        });
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }
}

/// Parse a message text into `(command, payload)`.
///
/// Returns `None` for anything that is not a bot command. The command name is
/// the first token without its leading `/` and without a `@botname` suffix;
/// the payload is the rest of the text, trimmed.
fn parse_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let (first, payload) = match rest.split_once(char::is_whitespace) {
        Some((first, payload)) => (first, payload.trim()),
        None => (rest, ""),
    };

    let command = first.split('@').next().unwrap_or(first);
    if command.is_empty() {
        return None;
    }
    Some((command, payload))
}
