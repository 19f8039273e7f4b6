//! Cull decision engine
//!
//! Given a snapshot of mobs and a removal budget, decides how many and
//! which mobs to remove. All removals go through a [`CullSession`].

pub mod balance;
pub mod hotspot;
pub mod priority;
pub mod random;
pub mod session;
pub mod strategy;
pub mod tiered;

pub use balance::balance;
pub use hotspot::{cull_hotspot, detect, ChunkKey, ChunkPopulationIndex, Hotspot, HotspotOutcome};
pub use priority::{classify, CullPriority};
pub use random::cull_in_order;
pub use session::CullSession;
pub use strategy::CullStrategy;
pub use tiered::{cull_by_priority, partition_by_priority};
