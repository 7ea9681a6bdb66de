//! Shared fixtures for the runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use duel_core::{
    ChannelId, Combatant, DuelConfig, FixedRewardRng, ResourceAxis, ResourcePool, Side, Spell,
    UserId,
};
use duel_runtime::{
    CastLoop, Event, EventBus, InMemoryUserRepo, MemoryTransport, Resolver, RewardSettler,
    Transport,
};
use tokio::sync::broadcast;

pub const CHANNEL: ChannelId = ChannelId(7);
pub const ALPHA: UserId = UserId(1);
pub const BETA: UserId = UserId(2);

pub fn alpha() -> Combatant {
    Combatant::new(ALPHA, "@alpha")
}

pub fn beta() -> Combatant {
    Combatant::new(BETA, "@beta")
}

/// Test spell driven by plain-text commands:
/// - `power N` adds N damage (2 MP)
/// - `guard N` adds N defence (1 MP)
/// - `free` is a recognized no-op (0 MP)
/// - `boom` panics, standing in for a faulty spell implementation
///
/// Commands are accepted for 30 seconds after the spell is created.
pub struct ScriptedSpell {
    created_at: DateTime<Utc>,
    power: i64,
    guard: i64,
}

impl ScriptedSpell {
    pub const WINDOW_SECS: i64 = 30;

    pub fn new() -> Self {
        Self::with(0, 0)
    }

    pub fn with(power: i64, guard: i64) -> Self {
        Self {
            created_at: Utc::now(),
            power,
            guard,
        }
    }
}

impl Spell for ScriptedSpell {
    fn can_cast_at(&self, at: DateTime<Utc>) -> bool {
        at <= self.created_at + TimeDelta::seconds(Self::WINDOW_SECS)
    }

    fn receive_command(&mut self, content: &str, _at: DateTime<Utc>) -> Option<u32> {
        let mut words = content.split_whitespace();
        match (words.next()?, words.next()) {
            ("power", Some(n)) => {
                self.power += n.parse::<i64>().ok()?;
                Some(2)
            }
            ("guard", Some(n)) => {
                self.guard += n.parse::<i64>().ok()?;
                Some(1)
            }
            ("free", None) => Some(0),
            ("boom", None) => panic!("spell blew up"),
            _ => None,
        }
    }

    fn calculate_damage(&self, _opponent: Option<&dyn Spell>) -> i64 {
        self.power
    }

    fn calculate_defence(&self, _opponent: &dyn Spell) -> i64 {
        self.guard
    }
}

pub fn scripted_factory() -> Box<dyn Spell> {
    Box::new(ScriptedSpell::new())
}

pub fn spell(power: i64, guard: i64) -> Box<dyn Spell> {
    Box::new(ScriptedSpell::with(power, guard))
}

/// Queue a full cast sequence: trigger, element generation, `commands`, execute.
pub fn cast(transport: &MemoryTransport, author: UserId, commands: &[&str]) {
    let config = DuelConfig::default();
    transport.deliver(CHANNEL, author, config.trigger_token.as_str());
    transport.deliver(CHANNEL, author, config.generate_token.as_str());
    for command in commands {
        transport.deliver(CHANNEL, author, *command);
    }
    transport.deliver(CHANNEL, author, config.execute_token.as_str());
}

/// A resolver over in-memory collaborators.
pub struct Arena {
    pub transport: Arc<MemoryTransport>,
    pub repository: Arc<InMemoryUserRepo>,
    pub event_bus: EventBus,
    pub resolver: Arc<Resolver>,
}

impl Arena {
    /// Battle pools are given directly; the store holds 100/100 for both.
    pub fn new(alpha_pool: ResourcePool, beta_pool: ResourcePool) -> Self {
        let transport = Arc::new(MemoryTransport::new());
        let repository = Arc::new(
            InMemoryUserRepo::new()
                .with_user(ALPHA, ResourcePool::STARTING)
                .with_user(BETA, ResourcePool::STARTING),
        );
        let event_bus = EventBus::new();
        let settler = RewardSettler::new(
            repository.clone(),
            Arc::new(FixedRewardRng::new(ResourceAxis::Mp, 0.5)),
            true,
        );
        let resolver = Resolver::new(
            CHANNEL,
            [alpha(), beta()],
            [alpha_pool, beta_pool],
            &DuelConfig::default(),
            transport.clone() as Arc<dyn Transport>,
            settler,
            event_bus.clone(),
        );

        Self {
            transport,
            repository,
            event_bus,
            resolver,
        }
    }

    /// A cast loop for `side` wired to this arena with default tokens.
    pub fn cast_loop(&self, side: Side) -> CastLoop {
        let caster = match side {
            Side::Alpha => alpha(),
            Side::Beta => beta(),
        };
        CastLoop::new(
            side,
            caster,
            CHANNEL,
            Arc::new(DuelConfig::default()),
            self.transport.clone(),
            self.resolver.clone(),
            Arc::new(scripted_factory),
            self.event_bus.clone(),
        )
    }
}

/// Everything published so far on one subscription.
pub fn drain(events: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
