//! Snapshot-order culling
//!
//! Ignores kind and priority entirely: walks the candidates in the order
//! the world returned them and removes live ones until the budget is spent.

use crate::cull::session::CullSession;
use crate::entity::MobSnapshot;
use crate::world::MobWorld;

pub fn cull_in_order<'a, W>(
    session: &mut CullSession<'_, W>,
    mobs: impl IntoIterator<Item = &'a MobSnapshot>,
    mut budget: usize,
) -> usize
where
    W: MobWorld + ?Sized,
{
    for mob in mobs {
        if budget == 0 {
            break;
        }
        if session.cull(mob) {
            budget -= 1;
        }
    }
    budget
}
