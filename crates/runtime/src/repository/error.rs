//! Error types raised by repository implementations.

use duel_core::UserId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user repository lock was poisoned")]
    LockPoisoned,

    #[error("no record for user {0}")]
    UserNotFound(UserId),

    #[error("user store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
