//! In-memory UserRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use duel_core::{ResourcePool, UserId};

use crate::repository::{RepositoryError, Result, UserRepository};

/// In-memory implementation of UserRepository.
///
/// Unknown users are enrolled with a starting record on first read, unless
/// the repository was created with [`InMemoryUserRepo::strict`].
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<UserId, ResourcePool>>,
    starting_record: Option<ResourcePool>,
}

impl InMemoryUserRepo {
    /// Create an empty repository that enrolls unknown users at 100/100.
    pub fn new() -> Self {
        Self::with_starting_record(ResourcePool::STARTING)
    }

    /// Create an empty repository that enrolls unknown users with `record`.
    pub fn with_starting_record(record: ResourcePool) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            starting_record: Some(record),
        }
    }

    /// Create an empty repository that rejects unknown users.
    pub fn strict() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            starting_record: None,
        }
    }

    /// Seed a record.
    pub fn with_user(self, id: UserId, record: ResourcePool) -> Self {
        if let Ok(mut users) = self.users.write() {
            users.insert(id, record);
        }
        self
    }

    /// Current record of `id` without enrolling it.
    pub fn record(&self, id: UserId) -> Option<ResourcePool> {
        self.users
            .read()
            .ok()
            .and_then(|users| users.get(&id).copied())
    }
}

impl Default for InMemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn get_user(&self, id: UserId) -> Result<ResourcePool> {
        let mut users = self
            .users
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        if let Some(record) = users.get(&id) {
            return Ok(*record);
        }

        let record = self.starting_record.ok_or(RepositoryError::UserNotFound(id))?;
        users.insert(id, record);
        Ok(record)
    }

    async fn update_user(&self, id: UserId, hp: i64, mp: i64) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        users.insert(id, ResourcePool::new(hp, mp));
        Ok(())
    }
}
