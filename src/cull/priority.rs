//! Cull priority classification
//!
//! Tiers are ordered by protection: mobs in a lower tier are always offered
//! to the balancer before any mob in a higher tier.

use serde::{Deserialize, Serialize};

use crate::core::types::MobKind;
use crate::entity::MobSnapshot;

/// Protection tier, lowest (culled first) to highest (culled last)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CullPriority {
    /// Not persistent; would despawn on its own
    Transient = 1,
    /// Persistent with no other value
    Persistent = 2,
    /// Tamed companions and dyed sheep
    Companion = 3,
    /// Mounts, villagers and player-built golems
    HighValue = 4,
    /// Custom name set or shown
    Named = 5,
}

impl CullPriority {
    /// Every tier, in cull order
    pub const CULL_ORDER: [CullPriority; 5] = [
        CullPriority::Transient,
        CullPriority::Persistent,
        CullPriority::Companion,
        CullPriority::HighValue,
        CullPriority::Named,
    ];

    /// Returns true if this tier is protected more strongly than the other
    pub fn outranks(&self, other: &CullPriority) -> bool {
        self > other
    }
}

/// Classify a mob into its protection tier
pub fn classify(mob: &MobSnapshot) -> CullPriority {
    // Naming overrides every other signal
    if mob.is_named() {
        return CullPriority::Named;
    }

    if !mob.persistent {
        return CullPriority::Transient;
    }

    match mob.kind {
        MobKind::Horse | MobKind::Villager => CullPriority::HighValue,
        MobKind::IronGolem if mob.player_created => CullPriority::HighValue,
        MobKind::Wolf | MobKind::Ocelot if mob.tamed => CullPriority::Companion,
        MobKind::Sheep if mob.dyed => CullPriority::Companion,
        _ => CullPriority::Persistent,
    }
}
