//! Error types surfaced by the duel runtime.
//!
//! Cast failures are local to one attempt or one loop and never escape a
//! [`crate::CastLoop`]. Only session start-up and task supervision can fail a
//! whole [`crate::BattleSession::start`] call.
use std::time::Duration;

use duel_core::Side;
use thiserror::Error;

pub use crate::repository::RepositoryError;
use crate::workers::CastStage;

pub type Result<T> = std::result::Result<T, DuelError>;

#[derive(Debug, Error)]
pub enum DuelError {
    #[error("battle session requires a {0} before building")]
    MissingComponent(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("cast loop task join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

/// Failures reported by a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no message arrived within {0:?}")]
    Timeout(Duration),

    #[error("transport closed")]
    Closed,

    #[error("failed to deliver message: {0}")]
    Send(String),
}

/// Why a cast attempt did not produce a spell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    #[error("{side} sent nothing within {timeout:?}")]
    Timeout { side: Side, timeout: Duration },

    #[error("{side} lacks {needed} MP during {stage}")]
    InsufficientResource {
        side: Side,
        stage: CastStage,
        needed: u32,
    },

    #[error("{side} sent {content:?} during {stage}")]
    InvalidCommand {
        side: Side,
        stage: CastStage,
        content: String,
    },

    #[error("transport closed")]
    TransportClosed,
}

impl CastError {
    pub(crate) fn from_transport(side: Side, error: TransportError) -> Self {
        match error {
            TransportError::Timeout(timeout) => CastError::Timeout { side, timeout },
            TransportError::Closed | TransportError::Send(_) => CastError::TransportClosed,
        }
    }
}
