//! In-memory world collaborator
//!
//! Holds mobs in spawn order, so `all_candidate_mobs` returns a stable
//! snapshot order. Every removal call is logged, including calls against
//! mobs that are already dead, so callers can be checked for duplicates.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::{AHashMap, AHashSet};

use crate::core::types::{BlockPos, ChunkCoord, MobId, MobKind, WorldId};
use crate::entity::MobSnapshot;
use crate::world::{MobWorld, ServerLimits, WorldInfo};

/// One logged removal call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalRequest {
    pub mob: MobId,
    pub kind: MobKind,
    pub intensity: u32,
}

#[derive(Debug, Clone)]
struct SimMob {
    snapshot: MobSnapshot,
    alive: bool,
    /// Removed, but still reporting live until `settle`
    dying: bool,
}

#[derive(Debug, Default)]
struct SimState {
    hard_cap: usize,
    deferred_death: bool,
    limits: ServerLimits,
    mobs: Vec<SimMob>,
    registry: AHashMap<MobId, usize>,
    worlds: Vec<WorldInfo>,
    loaded_chunks: AHashSet<(WorldId, ChunkCoord)>,
    removals: Vec<RemovalRequest>,
}

/// Thread-safe in-memory implementation of [`MobWorld`]
#[derive(Debug, Default)]
pub struct SimulatedWorld {
    state: RwLock<SimState>,
}

impl SimulatedWorld {
    pub fn new(hard_cap: usize) -> Self {
        Self {
            state: RwLock::new(SimState {
                hard_cap,
                ..SimState::default()
            }),
        }
    }

    /// Removed mobs keep reporting live until [`SimulatedWorld::settle`] is called
    pub fn with_deferred_death(self) -> Self {
        self.write().deferred_death = true;
        self
    }

    pub fn with_limits(self, limits: ServerLimits) -> Self {
        self.write().limits = limits;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, SimState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SimState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_hard_cap(&self, hard_cap: usize) {
        self.write().hard_cap = hard_cap;
    }

    pub fn spawn(&self, snapshot: MobSnapshot) -> MobId {
        let mut state = self.write();
        let id = snapshot.id;
        let index = state.mobs.len();
        state.mobs.push(SimMob {
            snapshot,
            alive: true,
            dying: false,
        });
        state.registry.insert(id, index);
        id
    }

    pub fn spawn_many(&self, snapshots: impl IntoIterator<Item = MobSnapshot>) -> Vec<MobId> {
        snapshots.into_iter().map(|s| self.spawn(s)).collect()
    }

    pub fn add_world(&self, info: WorldInfo) {
        let mut state = self.write();
        state.worlds.retain(|w| w.id != info.id);
        state.worlds.push(info);
    }

    pub fn add_player(&self, world: WorldId, pos: BlockPos) {
        let mut state = self.write();
        if let Some(info) = state.worlds.iter_mut().find(|w| w.id == world) {
            info.players.push(pos);
        }
    }

    pub fn set_full_time(&self, world: WorldId, full_time: u64) {
        let mut state = self.write();
        if let Some(info) = state.worlds.iter_mut().find(|w| w.id == world) {
            info.full_time = full_time;
        }
    }

    pub fn load_chunk(&self, world: WorldId, chunk: ChunkCoord) {
        self.write().loaded_chunks.insert((world, chunk));
    }

    /// Load every chunk in the square of `radius` around `center`
    pub fn load_square(&self, world: WorldId, center: ChunkCoord, radius: i32) {
        let mut state = self.write();
        for chunk in center.square(radius) {
            state.loaded_chunks.insert((world, chunk));
        }
    }

    /// Kill a mob from outside the culler (combat, lava, ...)
    pub fn kill(&self, id: MobId) {
        let mut state = self.write();
        if let Some(&index) = state.registry.get(&id) {
            state.mobs[index].alive = false;
        }
    }

    /// Apply deferred deaths
    pub fn settle(&self) {
        for mob in self.write().mobs.iter_mut().filter(|m| m.dying) {
            mob.alive = false;
            mob.dying = false;
        }
    }

    pub fn is_alive(&self, id: MobId) -> bool {
        let state = self.read();
        state
            .registry
            .get(&id)
            .map(|&index| state.mobs[index].alive)
            .unwrap_or(false)
    }

    pub fn live_count(&self) -> usize {
        self.read().mobs.iter().filter(|m| m.alive).count()
    }

    pub fn live_count_of(&self, kind: MobKind) -> usize {
        self.read()
            .mobs
            .iter()
            .filter(|m| m.alive && m.snapshot.kind == kind)
            .count()
    }

    pub fn removal_requests(&self) -> Vec<RemovalRequest> {
        self.read().removals.clone()
    }

    pub fn removal_count(&self) -> usize {
        self.read().removals.len()
    }

    pub fn clear_removal_log(&self) {
        self.write().removals.clear();
    }
}

impl MobWorld for SimulatedWorld {
    fn current_overage(&self) -> i64 {
        let state = self.read();
        let live = state.mobs.iter().filter(|m| m.alive).count();
        live as i64 - state.hard_cap as i64
    }

    fn all_candidate_mobs(&self) -> Vec<MobSnapshot> {
        self.read()
            .mobs
            .iter()
            .filter(|m| m.alive)
            .map(|m| m.snapshot.clone())
            .collect()
    }

    fn is_live(&self, mob: &MobSnapshot) -> bool {
        self.is_alive(mob.id)
    }

    fn remove(&self, mob: &MobSnapshot, intensity: u32) {
        let mut state = self.write();
        state.removals.push(RemovalRequest {
            mob: mob.id,
            kind: mob.kind,
            intensity,
        });

        let deferred = state.deferred_death;
        let Some(&index) = state.registry.get(&mob.id) else {
            return;
        };
        let sim = &mut state.mobs[index];
        if !sim.alive {
            return;
        }
        if deferred {
            sim.dying = true;
        } else {
            sim.alive = false;
        }
    }

    fn worlds(&self) -> Vec<WorldInfo> {
        self.read().worlds.clone()
    }

    fn living_mobs_in(&self, world: WorldId) -> Vec<MobSnapshot> {
        self.read()
            .mobs
            .iter()
            .filter(|m| m.alive && m.snapshot.world == world)
            .map(|m| m.snapshot.clone())
            .collect()
    }

    fn is_chunk_loaded(&self, world: WorldId, chunk: ChunkCoord) -> bool {
        self.read().loaded_chunks.contains(&(world, chunk))
    }

    fn server_limits(&self) -> ServerLimits {
        self.read().limits
    }
}
