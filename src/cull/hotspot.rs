//! Chunk concentration penalty
//!
//! Finds the most crowded 7x7 chunk window in any world. When that window
//! holds more than the configured share of the whole population, the
//! excess over the per-chunk average elsewhere is culled from the window
//! before the global stage sees the budget.

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::{ChunkCoord, WorldId};
use crate::cull::session::CullSession;
use crate::cull::tiered::cull_by_priority;
use crate::entity::MobSnapshot;
use crate::world::MobWorld;

/// Window half-width in chunks
pub const HOTSPOT_RADIUS: i32 = 3;

/// Chunk in a specific world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    pub world: WorldId,
    pub chunk: ChunkCoord,
}

impl ChunkKey {
    pub fn new(world: WorldId, chunk: ChunkCoord) -> Self {
        Self { world, chunk }
    }

    /// Every key in the hotspot window centred here
    pub fn window(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.chunk
            .square(HOTSPOT_RADIUS)
            .map(move |chunk| ChunkKey::new(self.world, chunk))
    }
}

/// Live mobs bucketed by chunk, rebuilt for every pass
#[derive(Debug, Default)]
pub struct ChunkPopulationIndex<'a> {
    chunks: AHashMap<ChunkKey, Vec<&'a MobSnapshot>>,
    total: usize,
}

impl<'a> ChunkPopulationIndex<'a> {
    pub fn build(
        mobs: impl IntoIterator<Item = &'a MobSnapshot>,
        mut is_live: impl FnMut(&MobSnapshot) -> bool,
    ) -> Self {
        let mut index = Self::default();
        for mob in mobs {
            if !is_live(mob) {
                continue;
            }
            index
                .chunks
                .entry(ChunkKey::new(mob.world, mob.chunk))
                .or_default()
                .push(mob);
            index.total += 1;
        }
        index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn occupied_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Mob count and occupied chunk count of the window centred on `center`
    pub fn window_stats(&self, center: &ChunkKey) -> (usize, usize) {
        center
            .window()
            .filter_map(|key| self.chunks.get(&key))
            .fold((0, 0), |(score, chunks), mobs| (score + mobs.len(), chunks + 1))
    }

    /// Every mob in the window centred on `center`
    pub fn window_mobs(&self, center: &ChunkKey) -> Vec<&'a MobSnapshot> {
        center
            .window()
            .filter_map(|key| self.chunks.get(&key))
            .flat_map(|mobs| mobs.iter().copied())
            .collect()
    }

    fn sorted_keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        keys.sort();
        keys
    }
}

/// An actionable concentration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub center: ChunkKey,
    /// Mobs inside the window
    pub window_score: usize,
    /// Occupied chunks inside the window
    pub window_chunks: usize,
    /// Removals charged to the window, already clamped to the budget
    pub excess: usize,
}

/// Find the most crowded window and decide whether it earns a penalty.
///
/// Returns `None` when the population is empty, when the window covers
/// every occupied chunk, when its share of the total is at or below
/// `penalty_threshold`, or when it is not above the average elsewhere.
pub fn detect(
    index: &ChunkPopulationIndex<'_>,
    budget_ceiling: usize,
    penalty_threshold: f64,
) -> Option<Hotspot> {
    let total = index.total();
    if total == 0 {
        return None;
    }

    // TODO: replace the per-chunk rescan with a summed-area table over the
    // sparse map once worlds with thousands of occupied chunks show up in profiles.
    let mut best: Option<(ChunkKey, usize, usize)> = None;
    for key in index.sorted_keys() {
        let (score, chunks) = index.window_stats(&key);
        if best.map_or(true, |(_, best_score, _)| score > best_score) {
            best = Some((key, score, chunks));
        }
    }
    let (center, window_score, window_chunks) = best?;

    let others = index.occupied_chunks() - window_chunks;
    if others == 0 {
        return None;
    }

    if window_score as f64 / total as f64 <= penalty_threshold {
        return None;
    }

    let average = total.div_ceil(others);
    let excess = window_score.saturating_sub(average).min(budget_ceiling);
    if excess == 0 {
        return None;
    }

    Some(Hotspot {
        center,
        window_score,
        window_chunks,
        excess,
    })
}

/// Result of the hotspot stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HotspotOutcome {
    pub hotspot: Option<Hotspot>,
    /// Removals made inside the window
    pub culled: usize,
    /// Global budget left for the next stage
    pub remaining_budget: usize,
}

/// Run the hotspot stage against `budget`.
///
/// Only the window's excess is spent here; anything the window could not
/// supply stays in the returned budget.
pub fn cull_hotspot<W, R>(
    session: &mut CullSession<'_, W>,
    index: &ChunkPopulationIndex<'_>,
    budget: usize,
    penalty_threshold: f64,
    rng: &mut R,
) -> HotspotOutcome
where
    W: MobWorld + ?Sized,
    R: Rng + ?Sized,
{
    let Some(hotspot) = detect(index, budget, penalty_threshold) else {
        return HotspotOutcome {
            hotspot: None,
            culled: 0,
            remaining_budget: budget,
        };
    };

    warn!(
        world = hotspot.center.world.0,
        x = hotspot.center.chunk.x,
        z = hotspot.center.chunk.z,
        window_score = hotspot.window_score,
        excess = hotspot.excess,
        "chunk concentration triggered a penalty purge"
    );

    let candidates = index.window_mobs(&hotspot.center);
    let leftover = cull_by_priority(session, candidates, hotspot.excess, rng);
    let culled = hotspot.excess - leftover;

    HotspotOutcome {
        hotspot: Some(hotspot),
        culled,
        remaining_budget: budget - culled,
    }
}
