//! World collaborator seam
//!
//! The culling passes never own mobs. Everything they know about the live
//! world comes through [`MobWorld`], and every removal goes back out through
//! it. The host game implements the trait; [`SimulatedWorld`] implements it
//! in memory for tests, benchmarks and the demo binary.

pub mod simulated;

pub use simulated::{RemovalRequest, SimulatedWorld};

use serde::{Deserialize, Serialize};

use crate::core::types::{BlockPos, ChunkCoord, WorldId};
use crate::entity::MobSnapshot;

/// Per-world context needed by the hostile soft cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub id: WorldId,
    pub name: String,
    /// Monster spawn limit for 256 loaded chunks
    pub monster_spawn_limit: u32,
    /// Absolute world time in ticks
    pub full_time: u64,
    /// Positions of connected players
    pub players: Vec<BlockPos>,
}

impl WorldInfo {
    pub fn new(id: WorldId, name: impl Into<String>, monster_spawn_limit: u32) -> Self {
        Self {
            id,
            name: name.into(),
            monster_spawn_limit,
            full_time: 0,
            players: Vec::new(),
        }
    }
}

/// Server-wide distances bounding the active spawn area, in chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLimits {
    pub spawn_radius: u32,
    pub view_distance: u32,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            spawn_radius: 8,
            view_distance: 10,
        }
    }
}

/// Live view of the game world
///
/// Snapshots carry no consistency guarantee across calls: a mob returned
/// by one call may already be dead by the next.
pub trait MobWorld {
    /// Live population above the hard cap; zero or negative when within budget
    fn current_overage(&self) -> i64;

    /// Every live non-player mob
    fn all_candidate_mobs(&self) -> Vec<MobSnapshot>;

    fn is_live(&self, mob: &MobSnapshot) -> bool;

    /// Request removal. Must be a no-op for mobs that are already gone, and
    /// may take effect after this call returns.
    fn remove(&self, mob: &MobSnapshot, intensity: u32);

    fn worlds(&self) -> Vec<WorldInfo>;

    /// Live mobs in one world
    fn living_mobs_in(&self, world: WorldId) -> Vec<MobSnapshot>;

    fn is_chunk_loaded(&self, world: WorldId, chunk: ChunkCoord) -> bool;

    fn server_limits(&self) -> ServerLimits;
}

impl<T: MobWorld + ?Sized> MobWorld for std::sync::Arc<T> {
    fn current_overage(&self) -> i64 {
        (**self).current_overage()
    }

    fn all_candidate_mobs(&self) -> Vec<MobSnapshot> {
        (**self).all_candidate_mobs()
    }

    fn is_live(&self, mob: &MobSnapshot) -> bool {
        (**self).is_live(mob)
    }

    fn remove(&self, mob: &MobSnapshot, intensity: u32) {
        (**self).remove(mob, intensity)
    }

    fn worlds(&self) -> Vec<WorldInfo> {
        (**self).worlds()
    }

    fn living_mobs_in(&self, world: WorldId) -> Vec<MobSnapshot> {
        (**self).living_mobs_in(world)
    }

    fn is_chunk_loaded(&self, world: WorldId, chunk: ChunkCoord) -> bool {
        (**self).is_chunk_loaded(world, chunk)
    }

    fn server_limits(&self) -> ServerLimits {
        (**self).server_limits()
    }
}
