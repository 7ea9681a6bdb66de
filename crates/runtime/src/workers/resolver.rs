//! Round resolution and the submission rendezvous.
//!
//! The resolver owns both resource pools and the round state. Cast loops meet
//! here through [`Resolver::submit`]:
//!
//! ```text
//! first submit   ── opens window ──┐
//!                                  │  resolution_delay
//! second submit  ── joins window ──┤
//!                                  ▼
//!                 damage → termination → reward → round_done (→ match_done)
//! ```
//!
//! Opening the window and draining it both happen under one mutex, so a
//! submission either joins the open round or opens the next one; nothing is
//! dropped or counted twice. The delayed resolution runs in its own task, so
//! cancelling a cast loop never strands a round.

use std::sync::Arc;
use std::time::Duration;

use duel_core::{
    ChannelId, Combatant, DuelConfig, Exchange, MatchOutcome, ResourcePool, Side, Spell,
    evaluate_outcome,
};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use super::reward::RewardSettler;
use crate::api::{SendOptions, Transport};
use crate::events::{CastEvent, Event, EventBus, MatchEvent, RoundEvent};
use crate::notices;

/// How a call to [`Resolver::submit`] took part in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The call opened the resolution window of `round`.
    Opened { round: u64 },
    /// The call landed inside the already open window of `round`.
    Joined { round: u64 },
    /// The match was already over; the spell was discarded.
    Ignored,
}

/// Mutable match state, only touched under the resolver's mutex.
struct MatchState {
    pools: [ResourcePool; 2],
    pending: [Option<Box<dyn Spell>>; 2],
    resolution_open: bool,
    finished: bool,
    /// Number of the round currently collecting spells.
    round: u64,
}

/// Snapshot of one resolved round, taken under the lock and reported after.
struct Resolution {
    exchange: Exchange,
    pools: [ResourcePool; 2],
    outcome: Option<MatchOutcome>,
}

/// Shared referee of one match.
pub struct Resolver {
    channel: ChannelId,
    combatants: [Combatant; 2],
    state: Mutex<MatchState>,
    /// Last fully resolved round; waiters wait for their round number.
    round_done: watch::Sender<u64>,
    match_done: watch::Sender<Option<MatchOutcome>>,
    transport: Arc<dyn Transport>,
    settler: RewardSettler,
    event_bus: EventBus,
    resolution_delay: Duration,
}

impl Resolver {
    /// Creates the resolver for one match.
    ///
    /// `combatants` and `pools` are indexed by [`Side::index`].
    pub fn new(
        channel: ChannelId,
        combatants: [Combatant; 2],
        pools: [ResourcePool; 2],
        config: &DuelConfig,
        transport: Arc<dyn Transport>,
        settler: RewardSettler,
        event_bus: EventBus,
    ) -> Arc<Self> {
        Arc::new(Self {
            channel,
            combatants,
            state: Mutex::new(MatchState {
                pools,
                pending: [None, None],
                resolution_open: false,
                finished: false,
                round: 1,
            }),
            round_done: watch::Sender::new(0),
            match_done: watch::Sender::new(None),
            transport,
            settler,
            event_bus,
            resolution_delay: config.resolution_delay,
        })
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    /// Spend MP from `side`'s pool; see [`ResourcePool::spend`].
    pub async fn spend_mp(&self, side: Side, amount: u32) -> bool {
        self.state.lock().await.pools[side.index()].spend(amount)
    }

    /// Current pools, indexed by [`Side::index`].
    pub async fn pools(&self) -> [ResourcePool; 2] {
        self.state.lock().await.pools
    }

    pub async fn is_finished(&self) -> bool {
        self.state.lock().await.finished
    }

    /// Number of rounds resolved so far.
    pub fn rounds_resolved(&self) -> u64 {
        *self.round_done.borrow()
    }

    /// The match result, once `match_done` has fired.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        *self.match_done.borrow()
    }

    /// Watch for the end of the match. The value turns `Some` exactly once.
    pub fn subscribe_match_done(&self) -> watch::Receiver<Option<MatchOutcome>> {
        self.match_done.subscribe()
    }

    /// Hand a finished spell to the current round.
    ///
    /// Returns once the round the spell took part in has been fully resolved,
    /// or immediately when the match is already over.
    pub async fn submit(self: &Arc<Self>, side: Side, spell: Box<dyn Spell>) -> Submission {
        let (round, opened, mut round_done) = {
            let mut state = self.state.lock().await;
            if state.finished {
                debug!(%side, "match finished, discarding spell");
                return Submission::Ignored;
            }

            state.pending[side.index()] = Some(spell);
            let round = state.round;
            let opened = !state.resolution_open;

            if opened {
                state.resolution_open = true;
                let resolver = Arc::clone(self);
                tokio::spawn(async move {
                    resolver.resolve_after_delay(round).await;
                });
            }

            // Subscribed under the lock: the round cannot complete before
            // this receiver exists.
            (round, opened, self.round_done.subscribe())
        };

        debug!(%side, round, opened, "spell submitted");
        self.event_bus.publish(Event::Cast(CastEvent::SpellSubmitted {
            side,
            round,
            opened_window: opened,
        }));

        if round_done.wait_for(|done| *done >= round).await.is_err() {
            warn!(%side, round, "resolver dropped before round completed");
        }

        if opened {
            Submission::Opened { round }
        } else {
            Submission::Joined { round }
        }
    }

    async fn resolve_after_delay(self: Arc<Self>, round: u64) {
        tokio::time::sleep(self.resolution_delay).await;

        let resolution = {
            let mut state = self.state.lock().await;

            let exchange = Exchange::between(&state.pending);
            exchange.apply(&mut state.pools);
            let outcome = evaluate_outcome(&state.pools);
            if outcome.is_some() {
                state.finished = true;
            }

            state.pending = [None, None];
            state.resolution_open = false;
            state.round += 1;

            Resolution {
                exchange,
                pools: state.pools,
                outcome,
            }
        };

        info!(
            round,
            alpha_to_beta = resolution.exchange.alpha_to_beta,
            beta_to_alpha = resolution.exchange.beta_to_alpha,
            alpha_hp = resolution.pools[Side::Alpha.index()].hp,
            beta_hp = resolution.pools[Side::Beta.index()].hp,
            "round resolved"
        );
        self.event_bus.publish(Event::Round(RoundEvent {
            round,
            exchange: resolution.exchange,
            pools: resolution.pools,
        }));

        self.report(&resolution).await;

        self.round_done.send_replace(round);

        if let Some(outcome) = resolution.outcome {
            info!(?outcome, rounds = round, "match finished");
            self.match_done.send_replace(Some(outcome));
            self.event_bus.publish(Event::Match(MatchEvent::Finished {
                outcome,
                rounds: round,
            }));
        }
    }

    async fn report(&self, resolution: &Resolution) {
        let alpha = self.combatant(Side::Alpha);
        let beta = self.combatant(Side::Beta);

        self.say(
            &notices::damage(alpha, beta, resolution.exchange.alpha_to_beta),
            SendOptions::default(),
        )
        .await;
        self.say(
            &notices::damage(beta, alpha, resolution.exchange.beta_to_alpha),
            SendOptions::default(),
        )
        .await;

        match resolution.outcome {
            Some(MatchOutcome::Draw) => {
                self.say(notices::DRAW, SendOptions::default()).await;
            }
            Some(MatchOutcome::Victory { winner }) => {
                self.say(
                    &notices::victory(self.combatant(winner)),
                    SendOptions::default(),
                )
                .await;
                self.pay_reward(winner).await;
            }
            None => {
                for side in Side::ALL {
                    let status =
                        notices::status(self.combatant(side), &resolution.pools[side.index()]);
                    self.say(&status, SendOptions::quiet()).await;
                }
            }
        }
    }

    async fn pay_reward(&self, winner_side: Side) {
        let winner = self.combatant(winner_side);
        let loser = self.combatant(winner_side.opponent());

        match self.settler.settle(winner.id, loser.id).await {
            Ok(settlement) => {
                let axis = settlement.plan.axis;
                self.say(
                    &notices::transfer(
                        winner,
                        axis,
                        settlement.winner_before.get(axis),
                        settlement.winner_after.get(axis),
                    ),
                    SendOptions::default(),
                )
                .await;
                self.say(
                    &notices::transfer(
                        loser,
                        axis,
                        settlement.loser_before.get(axis),
                        settlement.loser_after.get(axis),
                    ),
                    SendOptions::default(),
                )
                .await;
                self.event_bus
                    .publish(Event::Match(MatchEvent::RewardSettled(settlement)));
            }
            Err(e) => {
                error!(winner = %winner.id, loser = %loser.id, "reward settlement failed: {}", e);
            }
        }
    }

    async fn say(&self, text: &str, options: SendOptions) {
        if let Err(e) = self.transport.send(self.channel, text, options).await {
            warn!("failed to post to channel: {}", e);
        }
    }
}
