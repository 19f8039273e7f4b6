//! Priority-tiered culling
//!
//! Splits candidates by [`CullPriority`] and balances each tier in turn,
//! lowest protection first. A tier is only reached once every tier below it
//! has run out of live candidates.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::cull::balance::balance;
use crate::cull::priority::{classify, CullPriority};
use crate::cull::session::CullSession;
use crate::entity::MobSnapshot;
use crate::world::MobWorld;

/// Split mobs into tiers, preserving snapshot order within each tier
pub fn partition_by_priority<'a>(
    mobs: impl IntoIterator<Item = &'a MobSnapshot>,
) -> BTreeMap<CullPriority, Vec<&'a MobSnapshot>> {
    let mut tiers: BTreeMap<CullPriority, Vec<&'a MobSnapshot>> = BTreeMap::new();
    for mob in mobs {
        tiers.entry(classify(mob)).or_default().push(mob);
    }
    tiers
}

/// Cull up to `budget` mobs in ascending protection order.
/// Returns the unused budget.
pub fn cull_by_priority<'a, W, R>(
    session: &mut CullSession<'_, W>,
    mobs: impl IntoIterator<Item = &'a MobSnapshot>,
    mut budget: usize,
    rng: &mut R,
) -> usize
where
    W: MobWorld + ?Sized,
    R: Rng + ?Sized,
{
    if budget == 0 {
        return budget;
    }

    // BTreeMap iterates in CullPriority order
    for (tier, members) in partition_by_priority(mobs) {
        if budget == 0 {
            break;
        }
        let before = budget;
        budget = balance(session, &members, budget, rng);
        debug!(?tier, candidates = members.len(), culled = before - budget, "tier balanced");
    }

    budget
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ChunkCoord, MobKind, WorldId};
    use crate::world::SimulatedWorld;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mob(kind: MobKind) -> MobSnapshot {
        MobSnapshot::new(kind, WorldId(0), ChunkCoord::new(0, 0))
    }

    #[test]
    fn test_lower_tiers_exhausted_first() {
        let world = SimulatedWorld::new(0);
        let named = world.spawn(mob(MobKind::Cow).named("Daisy"));
        let horse = world.spawn(mob(MobKind::Horse).persistent());
        let plain: Vec<_> = (0..3).map(|_| world.spawn(mob(MobKind::Cow))).collect();
        let mobs = world.all_candidate_mobs();

        let mut session = CullSession::new(&world, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let remaining = cull_by_priority(&mut session, &mobs, 4, &mut rng);

        assert_eq!(remaining, 0);
        assert!(plain.iter().all(|id| !world.is_alive(*id)));
        assert!(!world.is_alive(horse));
        assert!(world.is_alive(named));
    }

    #[test]
    fn test_named_culled_only_when_nothing_else_left() {
        let world = SimulatedWorld::new(0);
        let named = world.spawn(mob(MobKind::Zombie).named("Steve"));
        let plain = world.spawn(mob(MobKind::Zombie));
        let mobs = world.all_candidate_mobs();

        let mut session = CullSession::new(&world, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(cull_by_priority(&mut session, &mobs, 1, &mut rng), 0);
        assert!(!world.is_alive(plain));
        assert!(world.is_alive(named));

        assert_eq!(cull_by_priority(&mut session, &mobs, 1, &mut rng), 0);
        assert!(!world.is_alive(named));
    }

    #[test]
    fn test_partition_keeps_tier_order() {
        let a = mob(MobKind::Cow).persistent();
        let b = mob(MobKind::Pig);
        let c = mob(MobKind::Sheep).named("Dolly");
        let mobs = vec![a, b, c];

        let tiers = partition_by_priority(&mobs);
        let order: Vec<CullPriority> = tiers.keys().copied().collect();
        assert_eq!(
            order,
            vec![CullPriority::Transient, CullPriority::Persistent, CullPriority::Named]
        );
    }
}
