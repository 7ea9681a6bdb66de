//! Battle session orchestrator.
//!
//! A session owns the collaborators of a duel (transport, user store, spell
//! factory, reward randomness) and exposes [`BattleSession::start`], which runs
//! one match from announcement to result. Matches started from the same
//! session share only the event bus.

use std::sync::Arc;

use tokio::sync::broadcast;

use duel_core::{
    ChannelId, Combatant, DuelConfig, MatchOutcome, ResourcePool, RewardRng, Side, SpellFactory,
};
use tracing::{debug, info};

use crate::api::{DuelError, Result, SendOptions, Transport};
use crate::events::{Event, EventBus, Topic};
use crate::notices;
use crate::repository::UserRepository;
use crate::rng::StdRewardRng;
use crate::workers::{CastLoop, Resolver, RewardSettler};

/// Session configuration shared by every match it starts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub duel: DuelConfig,
    pub event_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duel: DuelConfig::default(),
            event_buffer_size: 100,
        }
    }
}

/// Result of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// `None` when both cast loops stopped before anyone was defeated.
    pub outcome: Option<MatchOutcome>,
    /// Rounds resolved before the match ended.
    pub rounds: u64,
    /// In-battle pools at the end of the match.
    pub alpha: ResourcePool,
    pub beta: ResourcePool,
}

impl MatchReport {
    pub fn is_abandoned(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn pool(&self, side: Side) -> ResourcePool {
        match side {
            Side::Alpha => self.alpha,
            Side::Beta => self.beta,
        }
    }
}

/// Entry point for running duels.
///
/// Built through [`BattleSession::builder`]; every call to
/// [`BattleSession::start`] runs an independent match.
pub struct BattleSession {
    config: Arc<DuelConfig>,
    transport: Arc<dyn Transport>,
    repository: Arc<dyn UserRepository>,
    spells: Arc<dyn SpellFactory>,
    rng: Arc<dyn RewardRng>,
    event_bus: EventBus,
}

impl BattleSession {
    pub fn builder() -> BattleSessionBuilder {
        BattleSessionBuilder::new()
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Subscribe to one topic of the session's event bus.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Run a match between `alpha` and `beta` in `channel`.
    ///
    /// Returns once one side is defeated (or both are), or once both cast
    /// loops have stopped on their own, in which case the match is abandoned.
    /// Remaining loops are cancelled before returning.
    pub async fn start(
        &self,
        alpha: Combatant,
        beta: Combatant,
        channel: ChannelId,
    ) -> Result<MatchReport> {
        let pools = [
            self.repository.get_user(alpha.id).await?,
            self.repository.get_user(beta.id).await?,
        ];
        self.transport
            .send(channel, notices::GAME_START, SendOptions::default())
            .await?;
        info!(
            alpha = %alpha.id,
            beta = %beta.id,
            alpha_hp = pools[0].hp,
            alpha_mp = pools[0].mp,
            beta_hp = pools[1].hp,
            beta_mp = pools[1].mp,
            "match started"
        );

        let settler = RewardSettler::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.rng),
            self.config.clamp_reward_loss,
        );
        let combatants = [alpha, beta];
        let resolver = Resolver::new(
            channel,
            combatants.clone(),
            pools,
            &self.config,
            Arc::clone(&self.transport),
            settler,
            self.event_bus.clone(),
        );
        let mut match_done = resolver.subscribe_match_done();

        let [alpha, beta] = combatants;
        let alpha_task = tokio::spawn(self.cast_loop(Side::Alpha, alpha, channel, &resolver).run());
        let beta_task = tokio::spawn(self.cast_loop(Side::Beta, beta, channel, &resolver).run());
        let aborts = [alpha_task.abort_handle(), beta_task.abort_handle()];

        let joined = tokio::select! {
            biased;
            _ = match_done.wait_for(Option::is_some) => {
                debug!("match finished, cancelling cast loops");
                Ok(())
            }
            exits = async { tokio::try_join!(alpha_task, beta_task) } => {
                exits.map(|(alpha_exit, beta_exit)| {
                    debug!(%alpha_exit, %beta_exit, "both cast loops stopped");
                })
            }
        };

        // A failed loop must not leave its opponent playing on its own.
        for handle in &aborts {
            handle.abort();
        }
        joined.map_err(DuelError::WorkerJoin)?;

        let pools = resolver.pools().await;
        let report = MatchReport {
            outcome: resolver.outcome(),
            rounds: resolver.rounds_resolved(),
            alpha: pools[Side::Alpha.index()],
            beta: pools[Side::Beta.index()],
        };

        match report.outcome {
            Some(outcome) => info!(?outcome, rounds = report.rounds, "match over"),
            None => info!(rounds = report.rounds, "match abandoned"),
        }

        Ok(report)
    }

    fn cast_loop(
        &self,
        side: Side,
        caster: Combatant,
        channel: ChannelId,
        resolver: &Arc<Resolver>,
    ) -> CastLoop {
        CastLoop::new(
            side,
            caster,
            channel,
            Arc::clone(&self.config),
            Arc::clone(&self.transport),
            Arc::clone(resolver),
            Arc::clone(&self.spells),
            self.event_bus.clone(),
        )
    }
}

/// Builder for [`BattleSession`].
pub struct BattleSessionBuilder {
    config: SessionConfig,
    transport: Option<Arc<dyn Transport>>,
    repository: Option<Arc<dyn UserRepository>>,
    spells: Option<Arc<dyn SpellFactory>>,
    rng: Option<Arc<dyn RewardRng>>,
}

impl BattleSessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            transport: None,
            repository: None,
            spells: None,
            rng: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the chat transport (required)
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the persisted user store (required)
    pub fn repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the factory producing a fresh spell per cast attempt (required)
    pub fn spell_factory(mut self, factory: impl SpellFactory + 'static) -> Self {
        self.spells = Some(Arc::new(factory));
        self
    }

    /// Set the reward randomness (optional, defaults to OS entropy)
    pub fn rng(mut self, rng: Arc<dyn RewardRng>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<BattleSession> {
        let transport = self
            .transport
            .ok_or(DuelError::MissingComponent("transport"))?;
        let repository = self
            .repository
            .ok_or(DuelError::MissingComponent("user repository"))?;
        let spells = self
            .spells
            .ok_or(DuelError::MissingComponent("spell factory"))?;
        let rng = self
            .rng
            .unwrap_or_else(|| Arc::new(StdRewardRng::from_entropy()));

        Ok(BattleSession {
            config: Arc::new(self.config.duel),
            transport,
            repository,
            spells,
            rng,
            event_bus: EventBus::with_capacity(self.config.event_buffer_size),
        })
    }
}
