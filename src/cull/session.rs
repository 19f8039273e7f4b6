//! Per-pass removal gate
//!
//! Every stage of a pass removes mobs through one [`CullSession`], so a mob
//! picked by the hotspot stage is never charged a second time by the global
//! stage, even when the world still reports it live.

use ahash::AHashSet;

use crate::core::types::MobId;
use crate::entity::MobSnapshot;
use crate::world::MobWorld;

pub struct CullSession<'w, W: MobWorld + ?Sized> {
    world: &'w W,
    intensity: u32,
    culled: AHashSet<MobId>,
}

impl<'w, W: MobWorld + ?Sized> CullSession<'w, W> {
    pub fn new(world: &'w W, intensity: u32) -> Self {
        Self {
            world,
            intensity,
            culled: AHashSet::new(),
        }
    }

    /// Issue a removal request if the mob is still live and has not been
    /// culled earlier in this pass. Returns whether budget was consumed.
    pub fn cull(&mut self, mob: &MobSnapshot) -> bool {
        if self.culled.contains(&mob.id) || !self.world.is_live(mob) {
            return false;
        }
        self.world.remove(mob, self.intensity);
        self.culled.insert(mob.id);
        true
    }

    /// Live and not yet culled in this pass
    pub fn is_candidate(&self, mob: &MobSnapshot) -> bool {
        !self.culled.contains(&mob.id) && self.world.is_live(mob)
    }

    /// Removal requests issued so far
    pub fn removals(&self) -> usize {
        self.culled.len()
    }
}
