//! Asynchronous abstraction over the chat channel a duel is fought in.
//!
//! Runtime users plug in a [`Transport`] backed by a bot framework, a console,
//! or the in-memory [`crate::MemoryTransport`] used by tests.
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duel_core::{ChannelId, UserId};

use super::errors::TransportError;

/// A message received from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: ChannelId,
    pub author: UserId,
    pub content: String,
    /// Platform timestamp, checked against the spell's casting window.
    pub created_at: DateTime<Utc>,
}

/// Selects the messages one cast loop consumes: its own caster, in the duel's
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    pub channel: ChannelId,
    pub author: UserId,
}

impl MessageFilter {
    pub fn matches(&self, message: &InboundMessage) -> bool {
        message.channel == self.channel && message.author == self.author
    }
}

/// Delivery options for outbound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Whether mentions in the text should notify the mentioned users.
    pub notify_mentions: bool,
}

impl SendOptions {
    /// Render mentions without pinging anyone (status reports).
    pub const fn quiet() -> Self {
        Self {
            notify_mentions: false,
        }
    }
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            notify_mentions: true,
        }
    }
}

/// Chat transport consumed by the duel engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `text` to `channel`.
    async fn send(
        &self,
        channel: ChannelId,
        text: &str,
        options: SendOptions,
    ) -> Result<(), TransportError>;

    /// Wait for the next message accepted by `filter`.
    ///
    /// Fails with [`TransportError::Timeout`] when nothing matching arrives
    /// within `timeout`, and with [`TransportError::Closed`] once the
    /// transport has shut down.
    async fn wait_for_message(
        &self,
        filter: &MessageFilter,
        timeout: Duration,
    ) -> Result<InboundMessage, TransportError>;

    fn is_closed(&self) -> bool;
}
