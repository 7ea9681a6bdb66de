//! In-process transport for tests and hot-seat play.
//!
//! Inbound messages are queued until a waiter whose filter accepts them takes
//! them, so each cast loop only ever consumes its own caster's messages.
//! Outbound messages are recorded for inspection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duel_core::{ChannelId, UserId};
use tokio::sync::Notify;

use crate::api::{InboundMessage, MessageFilter, SendOptions, Transport, TransportError};

/// A message the engine posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel: ChannelId,
    pub text: String,
    pub options: SendOptions,
}

/// [`Transport`] backed by in-memory queues.
#[derive(Default)]
pub struct MemoryTransport {
    inbox: Mutex<VecDeque<InboundMessage>>,
    outbox: Mutex<Vec<OutboundMessage>>,
    arrived: Notify,
    closed: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message stamped with the current time.
    pub fn deliver(&self, channel: ChannelId, author: UserId, content: impl Into<String>) {
        self.deliver_at(channel, author, content, Utc::now());
    }

    /// Queue a message with an explicit platform timestamp.
    pub fn deliver_at(
        &self,
        channel: ChannelId,
        author: UserId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) {
        let message = InboundMessage {
            channel,
            author,
            content: content.into(),
            created_at,
        };
        self.inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message);
        self.arrived.notify_waiters();
    }

    /// Shut the transport down; pending and future waits fail with
    /// [`TransportError::Closed`] once the queue holds nothing for them.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.arrived.notify_waiters();
    }

    /// Everything posted so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts posted so far, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|message| message.text).collect()
    }

    /// Messages still waiting for a consumer.
    pub fn pending(&self) -> usize {
        self.inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn take_matching(&self, filter: &MessageFilter) -> Option<InboundMessage> {
        let mut inbox = self.inbox.lock().unwrap_or_else(PoisonError::into_inner);
        let index = inbox.iter().position(|message| filter.matches(message))?;
        inbox.remove(index)
    }

    async fn next_matching(&self, filter: &MessageFilter) -> Result<InboundMessage, TransportError> {
        loop {
            // Register before checking so a delivery between the check and the
            // await still wakes us.
            let notified = self.arrived.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(message) = self.take_matching(filter) {
                return Ok(message);
            }
            if self.is_closed() {
                return Err(TransportError::Closed);
            }

            notified.await;
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(
        &self,
        channel: ChannelId,
        text: &str,
        options: SendOptions,
    ) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OutboundMessage {
                channel,
                text: text.to_owned(),
                options,
            });
        Ok(())
    }

    async fn wait_for_message(
        &self,
        filter: &MessageFilter,
        timeout: Duration,
    ) -> Result<InboundMessage, TransportError> {
        tokio::time::timeout(timeout, self.next_matching(filter))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
