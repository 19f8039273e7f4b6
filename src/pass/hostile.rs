//! Hostile soft-cap pass
//!
//! Each world gets a hostile target derived from its spawn limit, the
//! chunks around its players and the lunar cycle. Aggression peaks at full
//! moon, so the hostile population swings instead of settling into a
//! steady state around spawners and farms.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::astronomy::{lunar_amplitude, MoonPhase};
use crate::core::config::CullConfig;
use crate::core::types::{ChunkCoord, WorldId};
use crate::cull::{cull_by_priority, cull_in_order, CullSession, CullStrategy};
use crate::entity::MobSnapshot;
use crate::pass::{Culler, PassOutcome, PassType};
use crate::world::{MobWorld, WorldInfo};

/// Hard ceiling on the spawn radius around a player, in chunks
pub const SPAWN_DISTANCE_CAP: u32 = 8;

/// Chunk count a world's monster spawn limit is expressed against
pub const CHUNKS_PER_SPAWN_LIMIT: usize = 256;

/// Loaded chunks within spawn range of any player in the world
pub fn active_spawn_chunks<W: MobWorld + ?Sized>(world: &W, info: &WorldInfo) -> AHashSet<ChunkCoord> {
    let limits = world.server_limits();
    let radius = limits
        .spawn_radius
        .min(limits.view_distance)
        .min(SPAWN_DISTANCE_CAP) as i32;

    let mut chunks = AHashSet::new();
    for player in &info.players {
        for chunk in player.chunk().square(radius) {
            if world.is_chunk_loaded(info.id, chunk) {
                chunks.insert(chunk);
            }
        }
    }
    chunks
}

/// Spawn limit scaled to the number of active chunks
pub fn natural_limit(monster_spawn_limit: u32, active_chunks: usize) -> usize {
    monster_spawn_limit as usize * active_chunks / CHUNKS_PER_SPAWN_LIMIT
}

/// Hostiles to remove this pass.
///
/// The target is `natural_limit * (100 - aggression) / 100`; the result is
/// capped at `max_per_pass_percent` of the current hostile count.
pub fn hostile_cull_budget(
    hostiles: usize,
    natural_limit: usize,
    aggression: u32,
    max_per_pass_percent: u32,
) -> usize {
    if hostiles == 0 {
        return 0;
    }
    let percentage_limit = 100 - aggression.min(100) as usize;
    let target = natural_limit * percentage_limit / 100;
    let over = hostiles.saturating_sub(target);
    let cap = max_per_pass_percent as usize * hostiles / 100;
    over.min(cap)
}

/// Aggression bounds over the lunar cycle, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggressionCycle {
    pub min: u32,
    pub max: u32,
    pub jitter: u32,
}

impl AggressionCycle {
    pub fn from_config(config: &CullConfig) -> Self {
        Self {
            min: config.min_monster_cull_aggression,
            max: config.max_monster_cull_aggression,
            jitter: config.aggression_jitter,
        }
    }

    /// Aggression at a world time, before jitter
    pub fn base_at(&self, full_time: u64) -> u32 {
        let span = self.max.saturating_sub(self.min) as f64;
        self.min + (lunar_amplitude(full_time) * span).round() as u32
    }

    /// Aggression at a world time with jitter applied, clamped to [min, max]
    pub fn sample<R: Rng + ?Sized>(&self, full_time: u64, rng: &mut R) -> u32 {
        let base = self.base_at(full_time);
        if self.jitter == 0 {
            return base;
        }
        let jitter = self.jitter as i64;
        let offset = rng.gen_range(-jitter..=jitter);
        (base as i64 + offset).clamp(self.min as i64, self.max as i64) as u32
    }
}

/// Hostile soft-cap outcome for one world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldCullReport {
    pub world: WorldId,
    pub name: String,
    pub hostiles: usize,
    pub active_chunks: usize,
    pub natural_limit: usize,
    pub moon: MoonPhase,
    pub aggression: u32,
    pub to_kill: usize,
    pub removals: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HostileReport {
    pub worlds: Vec<WorldCullReport>,
}

impl HostileReport {
    pub fn total_removals(&self) -> usize {
        self.worlds.iter().map(|w| w.removals).sum()
    }
}

impl<W: MobWorld, R: Rng> Culler<W, R> {
    /// Run one hostile soft-cap pass over every world
    pub fn run_hostile_soft_cap_pass(&self) -> PassOutcome<HostileReport> {
        let guard = self.guard(PassType::HostileSoftCap);
        let Some(_running) = guard.try_acquire() else {
            debug!(guard = guard.name(), "pass already running, skipping");
            return PassOutcome::Skipped;
        };

        if self.is_paused(PassType::HostileSoftCap) {
            debug!("hostile soft cap pass paused");
            return PassOutcome::Paused;
        }

        let config = self.config();
        if !config.monster_cull_to_spawn_enabled {
            return PassOutcome::Disabled;
        }

        let strategy = CullStrategy::from_name(&config.strategy);
        let cycle = AggressionCycle::from_config(&config);
        let mut rng = self.lock_rng(PassType::HostileSoftCap);
        let mut report = HostileReport::default();

        for info in self.world.worlds() {
            let active = active_spawn_chunks(&self.world, &info);
            let hostiles: Vec<MobSnapshot> = self
                .world
                .living_mobs_in(info.id)
                .into_iter()
                .filter(|m| m.kind.counts_toward_hostile_cap())
                .collect();

            let natural = natural_limit(info.monster_spawn_limit, active.len());
            let aggression = cycle.sample(info.full_time, &mut *rng);
            let to_kill = hostile_cull_budget(
                hostiles.len(),
                natural,
                aggression,
                config.max_monster_cull_per_pass,
            );

            info!(
                world = %info.name,
                hostiles = hostiles.len(),
                allowed_percent = 100 - aggression,
                natural_limit = natural,
                to_kill,
                "hostile cull"
            );

            let mut session = CullSession::new(&self.world, config.cull_damage);
            if to_kill > 0 {
                match strategy {
                    Some(CullStrategy::Random) => {
                        cull_in_order(&mut session, &hostiles, to_kill);
                    }
                    Some(CullStrategy::Priority) => {
                        cull_by_priority(&mut session, &hostiles, to_kill, &mut *rng);
                    }
                    None => warn!(
                        strategy = %config.strategy,
                        "hostile cull cannot determine culling strategy, no work to do"
                    ),
                }
            }

            report.worlds.push(WorldCullReport {
                world: info.id,
                name: info.name.clone(),
                hostiles: hostiles.len(),
                active_chunks: active.len(),
                natural_limit: natural,
                moon: MoonPhase::from_full_time(info.full_time),
                aggression,
                to_kill,
                removals: session.removals(),
            });
        }

        PassOutcome::Completed(report)
    }
}
