use std::time::Duration;

/// Duel configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelConfig {
    /// Message that starts a cast attempt.
    pub trigger_token: String,
    /// Message that must immediately follow the trigger.
    pub generate_token: String,
    /// Message that completes the spell under construction.
    pub execute_token: String,
    /// MP spent when elements are generated.
    pub generate_cost: u32,
    /// MP spent when a spell is executed.
    pub execute_cost: u32,
    /// How long a cast loop waits for each message from its caster.
    pub message_timeout: Duration,
    /// How long the first finished spell waits for the opponent's.
    pub resolution_delay: Duration,
    /// Clamp the loser's persisted resource at zero when paying a reward.
    pub clamp_reward_loss: bool,
}

impl DuelConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TRIGGER_TOKEN: &'static str = "aria command";
    pub const DEFAULT_GENERATE_TOKEN: &'static str = "generate element";
    pub const DEFAULT_EXECUTE_TOKEN: &'static str = "execute";
    pub const DEFAULT_GENERATE_COST: u32 = 1;
    pub const DEFAULT_EXECUTE_COST: u32 = 5;
    pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_RESOLUTION_DELAY: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            trigger_token: Self::DEFAULT_TRIGGER_TOKEN.to_owned(),
            generate_token: Self::DEFAULT_GENERATE_TOKEN.to_owned(),
            execute_token: Self::DEFAULT_EXECUTE_TOKEN.to_owned(),
            generate_cost: Self::DEFAULT_GENERATE_COST,
            execute_cost: Self::DEFAULT_EXECUTE_COST,
            message_timeout: Self::DEFAULT_MESSAGE_TIMEOUT,
            resolution_delay: Self::DEFAULT_RESOLUTION_DELAY,
            clamp_reward_loss: true,
        }
    }

    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    pub fn with_resolution_delay(mut self, delay: Duration) -> Self {
        self.resolution_delay = delay;
        self
    }

    pub fn with_clamp_reward_loss(mut self, clamp: bool) -> Self {
        self.clamp_reward_loss = clamp;
        self
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self::new()
    }
}
