//! # Configuration
//!
//! Main application configuration structure.
//! Matches the layout of `data/config.yaml`.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub telegram: TelegramConfig,
}

/// Specific configuration for the Telegram service.
#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Env var holding the bot token, e.g. "TELEGRAM_BOT_TOKEN".
    /// Takes precedence over `token` when set and present.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_poll_timeout() -> u64 {
    30
}

/// Retry behavior for failed handler invocations.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay")]
    pub delay_seconds: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_seconds: default_retry_delay(),
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

/// System-level settings for the bot.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    /// What to do when one event exhausts all retry attempts.
    #[serde(default)]
    pub on_command_failure: FailurePolicy,
}

/// Policy for a terminally failed event at the polling loop.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Propagate the failure and stop the whole bot.
    #[default]
    Stop,
    /// Log the failure and keep polling.
    Continue,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_dir() -> String {
    "data".to_string()
}

fn default_log_file() -> String {
    "errors.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Resolve the bot token: env var named by `token_env` first, then the
    /// inline `token` value.
    pub fn telegram_token(&self) -> Result<String> {
        let telegram = &self.services.telegram;
        if let Some(var) = &telegram.token_env {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    return Ok(value);
                }
            }
        }
        match &telegram.token {
            Some(token) if !token.is_empty() => Ok(token.clone()),
            _ => bail!("No Telegram bot token configured (services.telegram.token or token_env)"),
        }
    }
}
