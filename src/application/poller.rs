//! # Polling Loop
//!
//! Owns the bot's running state. Repeatedly pulls the next batch of events
//! from the transport, feeds each one to the router in arrival order, and
//! polls again. A cooperative stop signal is checked between batches and
//! interrupts an in-flight poll.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::retry::RetryExecutor;
use crate::application::router::CommandRouter;
use crate::domain::config::FailurePolicy;
use crate::domain::traits::Transport;
use crate::domain::types::InboundEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Polling,
    Dispatching,
    Stopped,
}

/// Create the stop signal pair. The sender side belongs to whoever decides
/// shutdown (Ctrl-C in `main`); the receiver goes to the loop.
pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

pub struct PollingLoop {
    transport: Arc<dyn Transport>,
    router: CommandRouter,
    retry: RetryExecutor,
    failure_policy: FailurePolicy,
    stop: watch::Receiver<bool>,
    state: LoopState,
}

impl PollingLoop {
    pub fn new(
        transport: Arc<dyn Transport>,
        router: CommandRouter,
        retry: RetryExecutor,
        failure_policy: FailurePolicy,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            transport,
            router,
            retry,
            failure_policy,
            stop,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until stopped or a fatal failure.
    ///
    /// Returns `Ok(())` on a cooperative stop. Returns `Err` when the poll
    /// itself fails terminally, or when an event exhausts its retries and
    /// the failure policy is [`FailurePolicy::Stop`]; the caller is expected
    /// to log that error and terminate the process.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Polling loop started");
        let result = self.poll_and_dispatch().await;
        self.state = LoopState::Stopped;
        result
    }

    async fn poll_and_dispatch(&mut self) -> Result<()> {
        loop {
            if *self.stop.borrow() {
                tracing::info!("Stop requested, shutting down polling loop");
                return Ok(());
            }

            self.state = LoopState::Polling;
            let mut stop = self.stop.clone();
            let batch = tokio::select! {
                // A closed sender counts as a stop request too.
                _ = stop.changed() => {
                    tracing::info!("Stop requested, shutting down polling loop");
                    return Ok(());
                }
                batch = self.next_batch() => batch?,
            };

            self.state = LoopState::Dispatching;
            for event in &batch {
                if let Err(e) = self.router.dispatch(event).await {
                    match self.failure_policy {
                        FailurePolicy::Stop => {
                            return Err(e.context(format!(
                                "command '{}' failed after all retry attempts",
                                event.command()
                            )));
                        }
                        FailurePolicy::Continue => {
                            tracing::error!(
                                "Command '{}' failed after all retry attempts: {:#}",
                                event.command(),
                                e
                            );
                        }
                    }
                }
            }
        }
    }

    /// One long poll, retried on transient transport errors with the shared
    /// policy. An exhausted poll retry is fatal for the loop.
    async fn next_batch(&self) -> Result<Vec<InboundEvent>> {
        self.retry
            .execute("poll", || self.transport.next_events())
            .await
            .context("polling for updates failed after all retry attempts")
    }
}
