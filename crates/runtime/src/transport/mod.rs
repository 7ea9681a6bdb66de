//! Transport implementations shipped with the runtime.

mod memory;

pub use memory::{MemoryTransport, OutboundMessage};
