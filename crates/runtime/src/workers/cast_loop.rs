//! Per-side command loop that turns a caster's messages into spells.
//!
//! Each attempt walks three stages:
//!
//! ```text
//! AwaitTrigger ──trigger──▶ AwaitElementGeneration ──generate──▶ AwaitCastCommands
//!      ▲                                                              │ execute
//!      └──────────────── submit to resolver, wait for round ◀─────────┘
//! ```
//!
//! Failed attempts restart at `AwaitTrigger`. Timeouts, transport closure,
//! running dry at element generation, and the end of the match stop the loop.

use std::sync::Arc;

use duel_core::{ChannelId, Combatant, DuelConfig, Side, Spell, SpellFactory};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::resolver::{Resolver, Submission};
use crate::api::{CastError, InboundMessage, MessageFilter, SendOptions, Transport};
use crate::events::{CastEvent, Event, EventBus};
use crate::notices;

/// Where a cast attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CastStage {
    AwaitTrigger,
    AwaitElementGeneration,
    AwaitCastCommands,
}

/// Why a cast loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopExit {
    MatchFinished,
    TransportClosed,
    TimedOut,
    ManaExhausted,
}

type AttemptResult<T> = std::result::Result<T, CastError>;

/// Consumes one caster's messages and feeds finished spells to the resolver.
pub struct CastLoop {
    side: Side,
    caster: Combatant,
    filter: MessageFilter,
    channel: ChannelId,
    config: Arc<DuelConfig>,
    transport: Arc<dyn Transport>,
    resolver: Arc<Resolver>,
    spells: Arc<dyn SpellFactory>,
    event_bus: EventBus,
}

impl CastLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        side: Side,
        caster: Combatant,
        channel: ChannelId,
        config: Arc<DuelConfig>,
        transport: Arc<dyn Transport>,
        resolver: Arc<Resolver>,
        spells: Arc<dyn SpellFactory>,
        event_bus: EventBus,
    ) -> Self {
        let filter = MessageFilter {
            channel,
            author: caster.id,
        };
        Self {
            side,
            caster,
            filter,
            channel,
            config,
            transport,
            resolver,
            spells,
            event_bus,
        }
    }

    /// Run attempts until the loop has a reason to stop.
    pub async fn run(self) -> LoopExit {
        let exit = loop {
            if self.resolver.is_finished().await {
                break LoopExit::MatchFinished;
            }
            if self.transport.is_closed() {
                break LoopExit::TransportClosed;
            }

            match self.attempt().await {
                Ok(spell) => {
                    self.notify(notices::SPELL_RELEASED).await;
                    match self.resolver.submit(self.side, spell).await {
                        Submission::Opened { round } | Submission::Joined { round } => {
                            debug!(side = %self.side, round, "round completed, restarting");
                        }
                        Submission::Ignored => break LoopExit::MatchFinished,
                    }
                }
                Err(e) => {
                    if let Some(exit) = self.exit_for(&e).await {
                        break exit;
                    }
                    self.abort(e).await;
                }
            }
        };

        info!(side = %self.side, %exit, "cast loop exited");
        self.event_bus.publish(Event::Cast(CastEvent::LoopExited {
            side: self.side,
            exit,
        }));
        exit
    }

    /// Errors that end the loop rather than the attempt.
    async fn exit_for(&self, error: &CastError) -> Option<LoopExit> {
        let exit = match error {
            CastError::Timeout { .. } => LoopExit::TimedOut,
            CastError::TransportClosed => LoopExit::TransportClosed,
            CastError::InsufficientResource {
                stage: CastStage::AwaitElementGeneration,
                ..
            } => LoopExit::ManaExhausted,
            _ => return None,
        };

        // A closed channel or a lapsed wait after the final round is just the
        // match ending underneath us.
        if self.resolver.is_finished().await {
            return Some(LoopExit::MatchFinished);
        }
        Some(exit)
    }

    async fn abort(&self, error: CastError) {
        let stage = match &error {
            CastError::InsufficientResource { stage, .. }
            | CastError::InvalidCommand { stage, .. } => *stage,
            _ => CastStage::AwaitTrigger,
        };
        debug!(side = %self.side, %stage, "cast attempt aborted: {}", error);

        self.notify(notices::CASTING_FAILED).await;
        self.event_bus.publish(Event::Cast(CastEvent::AttemptAborted {
            side: self.side,
            stage,
            reason: error.to_string(),
        }));
    }

    /// One pass through the three stages.
    async fn attempt(&self) -> AttemptResult<Box<dyn Spell>> {
        // AwaitTrigger: anything other than the trigger is chatter.
        loop {
            let message = self.next_message().await?;
            if message.content == self.config.trigger_token {
                break;
            }
            debug!(side = %self.side, content = %message.content, "ignoring message");
        }
        self.notify(notices::CASTING_STARTED).await;

        let message = self.next_message().await?;
        if message.content != self.config.generate_token {
            return Err(self.invalid(CastStage::AwaitElementGeneration, message));
        }
        self.spend(CastStage::AwaitElementGeneration, self.config.generate_cost)
            .await?;
        self.notify(notices::ELEMENTS_GENERATED).await;

        let mut spell = self.spells.create();
        loop {
            let message = self.next_message().await?;
            let content = message.content.as_str();

            if content == self.config.execute_token {
                self.spend(CastStage::AwaitCastCommands, self.config.execute_cost)
                    .await?;
                return Ok(spell);
            }

            if !spell.can_cast_at(message.created_at) {
                debug!(side = %self.side, "command arrived outside the casting window");
                return Err(self.invalid(CastStage::AwaitCastCommands, message));
            }

            match spell.receive_command(content, message.created_at) {
                Some(cost) => {
                    self.notify(notices::COMMAND_RECEIVED).await;
                    self.spend(CastStage::AwaitCastCommands, cost).await?;
                }
                None => return Err(self.invalid(CastStage::AwaitCastCommands, message)),
            }
        }
    }

    async fn next_message(&self) -> AttemptResult<InboundMessage> {
        self.transport
            .wait_for_message(&self.filter, self.config.message_timeout)
            .await
            .map_err(|e| CastError::from_transport(self.side, e))
    }

    /// Spend MP from this side's pool, telling the caster when it runs dry.
    async fn spend(&self, stage: CastStage, amount: u32) -> AttemptResult<()> {
        if self.resolver.spend_mp(self.side, amount).await {
            return Ok(());
        }
        self.notify(notices::MP_EXHAUSTED).await;
        Err(CastError::InsufficientResource {
            side: self.side,
            stage,
            needed: amount,
        })
    }

    fn invalid(&self, stage: CastStage, message: InboundMessage) -> CastError {
        CastError::InvalidCommand {
            side: self.side,
            stage,
            content: message.content,
        }
    }

    async fn notify(&self, notice: &str) {
        let text = notices::to_caster(&self.caster, notice);
        if let Err(e) = self
            .transport
            .send(self.channel, &text, SendOptions::default())
            .await
        {
            warn!(side = %self.side, "failed to notify caster: {}", e);
        }
    }
}
