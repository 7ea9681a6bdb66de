//! Repository contract for loading and saving user resource records.

use async_trait::async_trait;
use duel_core::{ResourcePool, UserId};

use super::error::Result;

/// Persistent store of every user's HP/MP.
///
/// This is for data that outlives a duel: the pools a duel starts from and
/// the transfer paid when one ends.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load the persisted record of `id`.
    async fn get_user(&self, id: UserId) -> Result<ResourcePool>;

    /// Overwrite the persisted record of `id`.
    async fn update_user(&self, id: UserId, hp: i64, mp: i64) -> Result<()>;
}
