//! Post-match reward settlement.
//!
//! Reads both persisted records, plans the transfer with the core reward
//! table, and writes both records back.

use std::sync::Arc;

use duel_core::{ResourcePool, RewardPlan, RewardRng, UserId, plan_reward};
use serde::Serialize;
use tracing::info;

use crate::repository::{Result, UserRepository};

/// Persisted transfer for one finished match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardSettlement {
    pub winner: UserId,
    pub loser: UserId,
    pub plan: RewardPlan,
    pub winner_before: ResourcePool,
    pub winner_after: ResourcePool,
    pub loser_before: ResourcePool,
    pub loser_after: ResourcePool,
}

/// Pays the winner of a match out of the loser's persisted resources.
pub struct RewardSettler {
    repository: Arc<dyn UserRepository>,
    rng: Arc<dyn RewardRng>,
    clamp_loss: bool,
}

impl RewardSettler {
    /// Creates a settler.
    ///
    /// With `clamp_loss` the loser's persisted value never drops below zero;
    /// without it the loser can end up in debt.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        rng: Arc<dyn RewardRng>,
        clamp_loss: bool,
    ) -> Self {
        Self {
            repository,
            rng,
            clamp_loss,
        }
    }

    pub async fn settle(&self, winner: UserId, loser: UserId) -> Result<RewardSettlement> {
        let winner_before = self.repository.get_user(winner).await?;
        let loser_before = self.repository.get_user(loser).await?;

        let plan = plan_reward(&winner_before, &loser_before, self.rng.as_ref());
        let winner_after = plan.winner_after(winner_before);
        let loser_after = plan.loser_after(loser_before, self.clamp_loss);

        self.repository
            .update_user(winner, winner_after.hp, winner_after.mp)
            .await?;
        self.repository
            .update_user(loser, loser_after.hp, loser_after.mp)
            .await?;

        info!(
            %winner,
            %loser,
            axis = %plan.axis,
            ratio = plan.ratio,
            gain = plan.gain,
            loss = plan.loss,
            "reward settled"
        );

        Ok(RewardSettlement {
            winner,
            loser,
            plan,
            winner_before,
            winner_after,
            loser_before,
            loser_after,
        })
    }
}
