use criterion::{black_box, criterion_group, criterion_main, Criterion};
use horde_cull::core::types::{ChunkCoord, MobKind, WorldId};
use horde_cull::cull::{detect, ChunkPopulationIndex};
use horde_cull::entity::MobSnapshot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn population(mobs: usize, spread: i32) -> Vec<MobSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBEEF);
    (0..mobs)
        .map(|_| {
            let chunk = ChunkCoord::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread));
            MobSnapshot::new(MobKind::Zombie, WorldId(0), chunk)
        })
        .collect()
}

fn bench_hotspot_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("hotspot_detect");

    for &(mobs, spread) in &[(2_000_usize, 20), (10_000, 60), (50_000, 150)] {
        let snapshot = population(mobs, spread);
        group.bench_function(format!("mobs{}_spread{}", mobs, spread), |b| {
            b.iter(|| {
                let index = ChunkPopulationIndex::build(&snapshot, |_| true);
                black_box(detect(&index, mobs / 10, 0.05))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hotspot_detect);
criterion_main!(benches);
