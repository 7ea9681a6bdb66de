//! Repository layer for persisted user records.
//!
//! The duel only reads each combatant's HP/MP at start-up and writes them back
//! when a reward is paid. In-progress battle state is never persisted.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryUserRepo;
pub use traits::UserRepository;
