//! Horde Cull - Demo Runner
//!
//! Builds a seeded in-memory world with a scattered population and one
//! dense animal farm, then runs hard-cap passes against it and prints the
//! run statistics.

use std::path::PathBuf;

use clap::Parser;
use horde_cull::core::astronomy::TICKS_PER_DAY;
use horde_cull::core::types::{BlockPos, ChunkCoord, MobKind, WorldId};
use horde_cull::entity::MobSnapshot;
use horde_cull::world::WorldInfo;
use horde_cull::{CullConfig, Culler, PassOutcome, Result, SimulatedWorld};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Run culling passes against a simulated world
#[derive(Parser, Debug)]
#[command(name = "horde-cull")]
#[command(about = "Run hard-cap and hostile culling passes against a simulated world")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Live mob hard cap
    #[arg(long, default_value_t = 400)]
    hard_cap: usize,

    /// Mobs scattered around the players
    #[arg(long, default_value_t = 450)]
    scattered: usize,

    /// Mobs packed into a single farm chunk
    #[arg(long, default_value_t = 300)]
    farm: usize,

    /// Number of passes to run; one in-game day passes between them
    #[arg(long, default_value_t = 8)]
    passes: u32,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

const OVERWORLD: WorldId = WorldId(0);

const SCATTER_KINDS: [MobKind; 10] = [
    MobKind::Zombie,
    MobKind::Skeleton,
    MobKind::Creeper,
    MobKind::Spider,
    MobKind::Cow,
    MobKind::Pig,
    MobKind::Sheep,
    MobKind::Chicken,
    MobKind::Wolf,
    MobKind::Horse,
];

#[derive(Serialize)]
struct PassSummary {
    pass: u32,
    overage: i64,
    removals: usize,
    hotspot: bool,
    hostile_removals: usize,
    live_after: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CullConfig::load(path)?,
        None => CullConfig::default(),
    };

    let world = build_world(&args);
    tracing::info!(live = world.live_count(), hard_cap = args.hard_cap, "world populated");

    let culler = Culler::seeded(world, config, args.seed)?;
    let mut summaries = Vec::new();

    for pass in 0..args.passes {
        culler
            .world()
            .set_full_time(OVERWORLD, pass as u64 * TICKS_PER_DAY);

        let summary = match culler.run_hard_cap_pass() {
            PassOutcome::Completed(report) => PassSummary {
                pass,
                overage: report.overage,
                removals: report.removals,
                hotspot: report.hotspot.is_some(),
                hostile_removals: report
                    .hostile
                    .completed()
                    .map(|h| h.total_removals())
                    .unwrap_or(0),
                live_after: culler.world().live_count(),
            },
            other => {
                tracing::warn!(?other, "pass did not complete");
                continue;
            }
        };
        summaries.push(summary);
    }

    if args.format == "json" {
        let output = serde_json::json!({
            "passes": summaries,
            "statistics": culler.statistics(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for s in &summaries {
            println!(
                "pass {:>2}: overage {:>4}, culled {:>4}{}, hostiles culled {:>3}, live {:>4}",
                s.pass,
                s.overage,
                s.removals,
                if s.hotspot { " (penalty purge)" } else { "" },
                s.hostile_removals,
                s.live_after
            );
        }
        println!();
        print!("{}", culler.statistics_report());
    }

    Ok(())
}

fn build_world(args: &Args) -> SimulatedWorld {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let world = SimulatedWorld::new(args.hard_cap);

    let mut info = WorldInfo::new(OVERWORLD, "world", 70);
    info.players.push(BlockPos::new(0, 64, 0));
    info.players.push(BlockPos::new(160, 70, -96));
    world.add_world(info);
    world.load_square(OVERWORLD, ChunkCoord::new(0, 0), 16);

    for _ in 0..args.scattered {
        let kind = SCATTER_KINDS[rng.gen_range(0..SCATTER_KINDS.len())];
        let chunk = ChunkCoord::new(rng.gen_range(-12..=12), rng.gen_range(-12..=12));
        let mut mob = MobSnapshot::new(kind, OVERWORLD, chunk);

        if !kind.is_monster() && rng.gen_bool(0.5) {
            mob = mob.persistent();
        }
        if kind == MobKind::Wolf && rng.gen_bool(0.3) {
            mob = mob.tamed();
        }
        if rng.gen_bool(0.02) {
            mob = mob.named(format!("Mob {}", rng.gen_range(0..1000)));
        }
        world.spawn(mob);
    }

    // The farm: one chunk full of persistent animals
    let farm_chunk = ChunkCoord::new(30, 30);
    for i in 0..args.farm {
        let kind = if i % 3 == 0 { MobKind::Chicken } else { MobKind::Cow };
        world.spawn(MobSnapshot::new(kind, OVERWORLD, farm_chunk).persistent());
    }

    world
}
