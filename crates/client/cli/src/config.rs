//! Console duel configuration and loaders.
use std::env;
use std::time::Duration;

use duel_core::{DuelConfig, ResourcePool};
use duel_runtime::SessionConfig;

/// Configuration required to run a local duel.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub session: SessionConfig,
    /// Record given to users the store has never seen.
    pub starting_record: ResourcePool,
    /// Seed for reward randomness; OS entropy when absent.
    pub rng_seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            starting_record: ResourcePool::STARTING,
            rng_seed: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUEL_MESSAGE_TIMEOUT_SECS` - Wait per caster message (default: 60)
    /// - `DUEL_RESOLUTION_DELAY_SECS` - Window for the second spell (default: 5)
    /// - `DUEL_START_HP` / `DUEL_START_MP` - Record of new users (default: 100/100)
    /// - `DUEL_CLAMP_REWARD_LOSS` - Keep the loser's record at or above 0 (default: true)
    /// - `DUEL_RNG_SEED` - Seed reward randomness (default: entropy)
    /// - `DUEL_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let duel: &mut DuelConfig = &mut config.session.duel;

        if let Some(secs) = read_env::<u64>("DUEL_MESSAGE_TIMEOUT_SECS") {
            duel.message_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("DUEL_RESOLUTION_DELAY_SECS") {
            duel.resolution_delay = Duration::from_secs(secs);
        }
        if let Some(clamp) = read_env::<bool>("DUEL_CLAMP_REWARD_LOSS") {
            duel.clamp_reward_loss = clamp;
        }

        if let Some(hp) = read_env::<i64>("DUEL_START_HP") {
            config.starting_record.hp = hp;
        }
        if let Some(mp) = read_env::<i64>("DUEL_START_MP") {
            config.starting_record.mp = mp.max(0);
        }

        config.rng_seed = read_env::<u64>("DUEL_RNG_SEED");

        if let Some(capacity) = read_env::<usize>("DUEL_EVENT_BUFFER") {
            config.session.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
