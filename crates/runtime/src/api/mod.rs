//! Public API surface of the duel runtime.
//!
//! Gathers the contracts external collaborators implement and the error types
//! surfaced to callers, so the worker modules can stay focused on the duel.

pub mod errors;
pub mod transport;

pub use errors::{CastError, DuelError, Result, TransportError};
pub use transport::{InboundMessage, MessageFilter, SendOptions, Transport};
