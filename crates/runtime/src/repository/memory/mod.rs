//! In-memory repository implementations for testing and local duels.

mod user;

pub use user::InMemoryUserRepo;
