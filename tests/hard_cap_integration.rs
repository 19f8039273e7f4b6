//! Integration tests for the hard-cap pass
//!
//! These tests drive `Culler::run_hard_cap_pass` against the in-memory
//! world and check:
//! - Hotspot penalty takes its share before the global stage
//! - Priority tiers protect named and valuable mobs
//! - Stale and deferred-death mobs never double-charge the budget
//! - Overlapping triggers of the same pass are skipped

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};

use horde_cull::core::types::{ChunkCoord, MobKind, WorldId};
use horde_cull::entity::MobSnapshot;
use horde_cull::world::{ServerLimits, WorldInfo};
use horde_cull::{CullConfig, Culler, MobWorld, PassOutcome, PassType, SimulatedWorld};

fn config(strategy: &str) -> CullConfig {
    CullConfig {
        strategy: strategy.to_string(),
        monster_cull_to_spawn_enabled: false,
        ..CullConfig::default()
    }
}

fn persistent_cows(chunk: ChunkCoord, count: usize) -> Vec<MobSnapshot> {
    (0..count)
        .map(|_| MobSnapshot::new(MobKind::Cow, WorldId(0), chunk).persistent())
        .collect()
}

#[test]
fn test_farm_chunk_absorbs_whole_budget() {
    // 9 chunks of 5 and one farm of 50, all low-value persistent
    let world = SimulatedWorld::new(75);
    for i in 0..9 {
        world.spawn_many(persistent_cows(ChunkCoord::new(i * 10, 0), 5));
    }
    let farm = ChunkCoord::new(300, 300);
    let farm_ids: HashSet<_> = world
        .spawn_many(persistent_cows(farm, 50))
        .into_iter()
        .collect();

    let culler = Culler::seeded(world, config("priority"), 42).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    assert_eq!(report.overage, 20);
    let hotspot = report.hotspot.expect("farm should trigger a penalty purge");
    assert_eq!(hotspot.center.chunk, farm);
    assert_eq!(hotspot.excess, 20);
    assert_eq!(report.hotspot_removals, 20);
    assert_eq!(report.removals, 20);
    assert_eq!(report.unused_budget, 0);

    let requests = culler.world().removal_requests();
    assert_eq!(requests.len(), 20);
    assert!(requests.iter().all(|r| farm_ids.contains(&r.mob)));
    assert_eq!(culler.world().current_overage(), 0);

    let stats = culler.statistics();
    assert_eq!(stats.executions, 1);
    assert_eq!(stats.penalty_purges, 1);
}

#[test]
fn test_leftover_budget_spreads_globally() {
    // Farm excess (39) is smaller than the overage (60)
    let world = SimulatedWorld::new(35);
    for i in 0..9 {
        world.spawn_many(persistent_cows(ChunkCoord::new(i * 10, 0), 5));
    }
    world.spawn_many(persistent_cows(ChunkCoord::new(300, 300), 50));

    let culler = Culler::seeded(world, config("priority"), 7).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    assert_eq!(report.overage, 60);
    assert_eq!(report.hotspot_removals, 39);
    assert_eq!(report.removals, 60);
    assert_eq!(culler.world().live_count(), 35);
}

#[test]
fn test_priority_tiers_protect_valuable_mobs() {
    let world = SimulatedWorld::new(4);
    let chunk = ChunkCoord::new(0, 0);
    let named = world.spawn(MobSnapshot::new(MobKind::Zombie, WorldId(0), chunk).named("Gregory"));
    let horse = world.spawn(MobSnapshot::new(MobKind::Horse, WorldId(0), chunk).persistent());
    let wolf = world.spawn(MobSnapshot::new(MobKind::Wolf, WorldId(0), chunk).persistent().tamed());
    let golem = world.spawn(
        MobSnapshot::new(MobKind::IronGolem, WorldId(0), chunk)
            .persistent()
            .player_created(),
    );
    world.spawn_many((0..6).map(|_| MobSnapshot::new(MobKind::Zombie, WorldId(0), chunk)));
    world.spawn_many(persistent_cows(chunk, 2));

    let culler = Culler::seeded(world, config("priority"), 9).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    // 12 live, cap 4: all 6 transient zombies, both cows, nothing else
    assert_eq!(report.removals, 8);
    let world = culler.world();
    assert!(world.is_alive(named));
    assert!(world.is_alive(horse));
    assert!(world.is_alive(wolf));
    assert!(world.is_alive(golem));
    assert_eq!(world.live_count_of(MobKind::Cow), 0);
}

#[test]
fn test_named_mob_is_last_to_go() {
    let world = SimulatedWorld::new(0);
    let chunk = ChunkCoord::new(0, 0);
    let named = world.spawn(MobSnapshot::new(MobKind::Pig, WorldId(0), chunk).named("Wilbur"));
    world.spawn(MobSnapshot::new(MobKind::Horse, WorldId(0), chunk).persistent());
    world.set_hard_cap(1);

    let culler = Culler::seeded(world, config("priority"), 1).unwrap();
    culler.run_hard_cap_pass();
    assert!(culler.world().is_alive(named));

    culler.world().set_hard_cap(0);
    culler.run_hard_cap_pass();
    assert!(!culler.world().is_alive(named));
}

#[test]
fn test_deferred_deaths_not_double_charged() {
    // Removed mobs keep reporting live until settle(), as a real server
    // might between the damage call and the death tick
    let world = SimulatedWorld::new(20).with_deferred_death();
    for i in 0..9 {
        world.spawn_many(persistent_cows(ChunkCoord::new(i * 10, 0), 5));
    }
    world.spawn_many(persistent_cows(ChunkCoord::new(300, 300), 50));

    let culler = Culler::seeded(world, config("priority"), 3).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    // 39 from the farm window, 36 more from the global stage
    assert_eq!(report.hotspot_removals, 39);
    assert_eq!(report.removals, 75);
    let requests = culler.world().removal_requests();
    let unique: HashSet<_> = requests.iter().map(|r| r.mob).collect();
    assert_eq!(unique.len(), requests.len());
    assert_eq!(requests.len(), 75);

    culler.world().settle();
    assert_eq!(culler.world().live_count(), 20);
}

#[test]
fn test_random_strategy_ignores_protection() {
    let world = SimulatedWorld::new(2);
    let chunk = ChunkCoord::new(0, 0);
    let named = world.spawn(MobSnapshot::new(MobKind::Cow, WorldId(0), chunk).named("First"));
    world.spawn_many((0..4).map(|_| MobSnapshot::new(MobKind::Cow, WorldId(0), chunk)));

    let culler = Culler::seeded(world, config("Random"), 1).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    assert_eq!(report.removals, 3);
    assert!(report.hotspot.is_none());
    assert!(!culler.world().is_alive(named));
}

#[test]
fn test_stats_average_over_runs() {
    let world = SimulatedWorld::new(5);
    let culler = Culler::seeded(world, config("priority"), 1).unwrap();

    for _ in 0..3 {
        culler
            .world()
            .spawn_many(persistent_cows(ChunkCoord::new(0, 0), 10));
        culler.run_hard_cap_pass();
    }

    let stats = culler.statistics();
    assert_eq!(stats.executions, 3);
    assert!(stats.average_ms >= 0.0);
    assert!(culler.statistics_report().contains("Execution count: 3"));
}

#[test]
fn test_hard_cap_pass_runs_hostile_pass() {
    let world = SimulatedWorld::new(1000).with_limits(ServerLimits {
        spawn_radius: 8,
        view_distance: 8,
    });
    let mut info = WorldInfo::new(WorldId(0), "world", 0);
    info.players.push(horde_cull::core::types::BlockPos::new(0, 64, 0));
    world.add_world(info);
    world.load_square(WorldId(0), ChunkCoord::new(0, 0), 8);
    world.spawn_many(
        (0..20).map(|_| MobSnapshot::new(MobKind::Zombie, WorldId(0), ChunkCoord::new(1, 1))),
    );

    let config = CullConfig {
        max_monster_cull_per_pass: 50,
        ..CullConfig::default()
    };
    let culler = Culler::seeded(world, config, 1).unwrap();
    let report = culler.run_hard_cap_pass().completed().unwrap();

    // Within the hard cap, but a zero spawn limit leaves no room for hostiles
    assert_eq!(report.removals, 0);
    let hostile = report.hostile.completed().unwrap();
    assert_eq!(hostile.total_removals(), 10);
}

#[test]
fn test_culler_over_shared_world_handle() {
    // The host keeps its own handle and keeps spawning between passes
    let world = Arc::new(SimulatedWorld::new(3));
    let culler = Culler::seeded(Arc::clone(&world), config("priority"), 5).unwrap();

    world.spawn_many(persistent_cows(ChunkCoord::new(0, 0), 5));
    assert_eq!(culler.run_hard_cap_pass().completed().unwrap().removals, 2);

    world.spawn_many(persistent_cows(ChunkCoord::new(1, 0), 4));
    assert_eq!(culler.run_hard_cap_pass().completed().unwrap().removals, 4);
    assert_eq!(world.live_count(), 3);
    assert_eq!(world.removal_count(), 6);
}

/// World that parks the first `current_overage` call until released
struct GatedWorld {
    inner: SimulatedWorld,
    armed: AtomicBool,
    entered: Barrier,
    release: Barrier,
}

impl GatedWorld {
    fn new(inner: SimulatedWorld) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        }
    }
}

impl MobWorld for GatedWorld {
    fn current_overage(&self) -> i64 {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        self.inner.current_overage()
    }

    fn all_candidate_mobs(&self) -> Vec<MobSnapshot> {
        self.inner.all_candidate_mobs()
    }

    fn is_live(&self, mob: &MobSnapshot) -> bool {
        self.inner.is_live(mob)
    }

    fn remove(&self, mob: &MobSnapshot, intensity: u32) {
        self.inner.remove(mob, intensity)
    }

    fn worlds(&self) -> Vec<WorldInfo> {
        self.inner.worlds()
    }

    fn living_mobs_in(&self, world: WorldId) -> Vec<MobSnapshot> {
        self.inner.living_mobs_in(world)
    }

    fn is_chunk_loaded(&self, world: WorldId, chunk: ChunkCoord) -> bool {
        self.inner.is_chunk_loaded(world, chunk)
    }

    fn server_limits(&self) -> ServerLimits {
        self.inner.server_limits()
    }
}

#[test]
fn test_overlapping_trigger_is_skipped() {
    let inner = SimulatedWorld::new(2);
    inner.spawn_many((0..5).map(|_| MobSnapshot::new(MobKind::Cow, WorldId(0), ChunkCoord::new(0, 0))));
    let culler = Culler::seeded(GatedWorld::new(inner), config("random"), 1).unwrap();

    std::thread::scope(|scope| {
        let first = scope.spawn(|| culler.run_hard_cap_pass());

        // First pass is now parked inside the guard
        culler.world().entered.wait();
        assert!(culler.is_running(PassType::HardCap));

        let second = culler.run_hard_cap_pass();
        assert!(second.is_skipped());
        assert_eq!(second, PassOutcome::Skipped);
        assert_eq!(culler.world().inner.removal_count(), 0);

        culler.world().release.wait();
        let first = first.join().unwrap().completed().unwrap();
        assert_eq!(first.removals, 3);
    });

    assert!(!culler.is_running(PassType::HardCap));
    assert_eq!(culler.world().inner.removal_count(), 3);
    assert_eq!(culler.statistics().executions, 1);
}
