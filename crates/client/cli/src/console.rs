//! Hot-seat console transport.
//!
//! Both casters share one terminal. Input lines are routed by prefix
//! (`a <text>` for Alpha, `b <text>` for Beta) into an in-memory inbox;
//! everything the engine posts is printed to stdout.
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use duel_core::{ChannelId, Combatant, Side};
use duel_runtime::{
    InboundMessage, MemoryTransport, MessageFilter, SendOptions, Transport, TransportError,
};
use tracing::{debug, warn};

/// Split an input line into the side it speaks for and its content.
pub fn parse_line(line: &str) -> Option<(Side, &str)> {
    let (prefix, content) = line.trim().split_once(char::is_whitespace)?;
    let side = match prefix.to_ascii_lowercase().as_str() {
        "a" | "alpha" => Side::Alpha,
        "b" | "beta" => Side::Beta,
        _ => return None,
    };
    let content = content.trim();
    (!content.is_empty()).then_some((side, content))
}

pub struct ConsoleTransport {
    channel: ChannelId,
    casters: [Combatant; 2],
    inbox: MemoryTransport,
}

impl ConsoleTransport {
    pub fn new(channel: ChannelId, casters: [Combatant; 2]) -> Self {
        Self {
            channel,
            casters,
            inbox: MemoryTransport::new(),
        }
    }

    /// Route one line of input. Returns false when the line was not understood.
    pub fn feed(&self, line: &str) -> bool {
        match parse_line(line) {
            Some((side, content)) => {
                let author = self.casters[side.index()].id;
                self.inbox.deliver(self.channel, author, content);
                true
            }
            None => false,
        }
    }

    /// Stop accepting input; waiting casters see a closed transport.
    pub fn close(&self) {
        self.inbox.close();
    }

    /// Read stdin on a plain thread until EOF, then close the transport.
    ///
    /// A blocking thread keeps an unfinished read from holding the async
    /// runtime open after the match ends.
    pub fn spawn_stdin_reader(self: &Arc<Self>) {
        let transport = Arc::clone(self);
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => {
                        if !transport.feed(&line) {
                            eprintln!("usage: a <text> | b <text>");
                        }
                    }
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
            debug!("stdin closed");
            transport.close();
        });
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(
        &self,
        _channel: ChannelId,
        text: &str,
        _options: SendOptions,
    ) -> Result<(), TransportError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)
            .and_then(|()| stdout.flush())
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn wait_for_message(
        &self,
        filter: &MessageFilter,
        timeout: Duration,
    ) -> Result<InboundMessage, TransportError> {
        self.inbox.wait_for_message(filter, timeout).await
    }

    fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}
