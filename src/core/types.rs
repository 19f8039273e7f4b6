//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for mobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobId(pub Uuid);

impl MobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MobId {
    fn default() -> Self {
        Self::new()
    }
}

/// World identifier (overworld, nether, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Side length of a chunk in blocks
pub const CHUNK_SIZE: i32 = 16;

/// Chunk coordinate, the spatial bucket mobs are counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// `None` when the result falls outside the `i32` coordinate space
    pub fn offset(&self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// All coordinates in the square of the given radius around this chunk.
    /// Near the edge of the coordinate space the square is clipped, never wrapped.
    pub fn square(&self, radius: i32) -> impl Iterator<Item = ChunkCoord> + '_ {
        (-radius..=radius)
            .flat_map(move |dx| (-radius..=radius).filter_map(move |dz| self.offset(dx, dz)))
    }
}

/// Block position in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing this block (floor division, so negative blocks land correctly)
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::new(self.x.div_euclid(CHUNK_SIZE), self.z.div_euclid(CHUNK_SIZE))
    }
}

/// Mob kind enumeration
///
/// Declaration order is the tie-break between equally sized kind groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MobKind {
    // Monsters
    Zombie,
    Skeleton,
    WitherSkeleton,
    Creeper,
    Spider,
    CaveSpider,
    Enderman,
    Witch,
    Silverfish,
    Blaze,
    ZombiePigman,
    Wither,
    // Special-case hostiles
    Ghast,
    Slime,
    MagmaCube,
    // Passive and utility
    Cow,
    Pig,
    Sheep,
    Chicken,
    Mooshroom,
    Horse,
    Villager,
    IronGolem,
    Wolf,
    Ocelot,
    Squid,
    Bat,
}

impl MobKind {
    /// Member of the monster family. Ghasts and slimes are hostile but spawn
    /// under their own rules, so they are not counted here.
    pub fn is_monster(&self) -> bool {
        matches!(
            self,
            MobKind::Zombie
                | MobKind::Skeleton
                | MobKind::WitherSkeleton
                | MobKind::Creeper
                | MobKind::Spider
                | MobKind::CaveSpider
                | MobKind::Enderman
                | MobKind::Witch
                | MobKind::Silverfish
                | MobKind::Blaze
                | MobKind::ZombiePigman
                | MobKind::Wither
        )
    }

    /// Rare constructs never touched by the hostile soft cap
    pub fn is_hostile_cull_exempt(&self) -> bool {
        matches!(self, MobKind::WitherSkeleton | MobKind::Wither)
    }

    /// Counted and culled by the hostile soft cap
    pub fn counts_toward_hostile_cap(&self) -> bool {
        self.is_monster() && !self.is_hostile_cull_exempt()
    }
}
