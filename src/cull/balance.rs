//! Category balancing within a single priority tier
//!
//! Mobs are grouped by kind. The largest groups are trimmed down to the
//! average group size first, then removals rotate across every group one
//! mob at a time. A farm of a single kind therefore absorbs the budget
//! first, but never to the exclusion of everything else once it is level
//! with its neighbours.

use std::collections::{BTreeMap, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::MobKind;
use crate::cull::session::CullSession;
use crate::entity::MobSnapshot;
use crate::world::MobWorld;

/// Mobs of one kind, in removal order
#[derive(Debug)]
pub(crate) struct KindGroup<'a> {
    pub kind: MobKind,
    pub members: VecDeque<&'a MobSnapshot>,
}

/// Group mobs by kind, largest group first, ties broken by kind order
pub(crate) fn group_by_kind<'a>(mobs: &[&'a MobSnapshot]) -> Vec<KindGroup<'a>> {
    let mut by_kind: BTreeMap<MobKind, Vec<&'a MobSnapshot>> = BTreeMap::new();
    for &mob in mobs {
        by_kind.entry(mob.kind).or_default().push(mob);
    }

    let mut groups: Vec<KindGroup<'a>> = by_kind
        .into_iter()
        .map(|(kind, members)| KindGroup {
            kind,
            members: members.into(),
        })
        .collect();

    // Stable sort keeps kind order among equal sizes
    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    groups
}

/// Trim every group above the average size down to the average.
/// Each group is shuffled before trimming.
pub(crate) fn equalize<W, R>(
    session: &mut CullSession<'_, W>,
    groups: &mut [KindGroup<'_>],
    mut budget: usize,
    rng: &mut R,
) -> usize
where
    W: MobWorld + ?Sized,
    R: Rng + ?Sized,
{
    if groups.is_empty() {
        return budget;
    }

    let total: usize = groups.iter().map(|g| g.members.len()).sum();
    let average = total / groups.len();

    for group in groups.iter_mut() {
        if budget == 0 {
            break;
        }

        group.members.make_contiguous().shuffle(rng);

        while group.members.len() > average && budget > 0 {
            let Some(mob) = group.members.pop_front() else {
                break;
            };
            if session.cull(mob) {
                budget -= 1;
            }
        }
    }

    budget
}

/// Remove one mob from each non-empty group in turn until the budget runs
/// out or a full sweep finds every group empty.
pub(crate) fn round_robin<W>(
    session: &mut CullSession<'_, W>,
    groups: &mut [KindGroup<'_>],
    mut budget: usize,
) -> usize
where
    W: MobWorld + ?Sized,
{
    while budget > 0 {
        let mut popped_any = false;

        for group in groups.iter_mut() {
            if budget == 0 {
                break;
            }
            if let Some(mob) = group.members.pop_front() {
                popped_any = true;
                if session.cull(mob) {
                    budget -= 1;
                }
            }
        }

        if !popped_any {
            break;
        }
    }

    budget
}

/// Cull up to `budget` mobs from one tier, spreading removals across kinds.
/// Returns the budget left over when candidates run out.
pub fn balance<W, R>(
    session: &mut CullSession<'_, W>,
    mobs: &[&MobSnapshot],
    budget: usize,
    rng: &mut R,
) -> usize
where
    W: MobWorld + ?Sized,
    R: Rng + ?Sized,
{
    if mobs.is_empty() || budget == 0 {
        return budget;
    }

    let mut groups = group_by_kind(mobs);
    let budget = equalize(session, &mut groups, budget, rng);
    round_robin(session, &mut groups, budget)
}
