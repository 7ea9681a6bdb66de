//! Worker tasks that back a battle session.
//!
//! Each side runs a [`CastLoop`]; both hand finished spells to the shared
//! [`Resolver`], which pays rewards through the [`RewardSettler`].

mod cast_loop;
mod resolver;
mod reward;

pub use cast_loop::{CastLoop, CastStage, LoopExit};
pub use resolver::{Resolver, Submission};
pub use reward::{RewardSettlement, RewardSettler};
