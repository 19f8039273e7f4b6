//! Mob snapshots as seen by the culling passes
//!
//! A snapshot is a read-only copy of the attributes that matter for cull
//! decisions. Liveness is never cached here; it is always asked of the
//! world collaborator at the moment of removal.

use serde::{Deserialize, Serialize};

use crate::core::types::{ChunkCoord, MobId, MobKind, WorldId};

/// Snapshot of one live, non-player mob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobSnapshot {
    pub id: MobId,
    pub kind: MobKind,
    pub world: WorldId,
    pub chunk: ChunkCoord,
    /// Custom display name, if one was ever set
    pub custom_name: Option<String>,
    pub custom_name_visible: bool,
    /// Survives distance despawn
    pub persistent: bool,
    pub tamed: bool,
    /// Carries a non-default colour (dyed sheep)
    pub dyed: bool,
    /// Built by a player rather than spawned naturally (iron golems)
    pub player_created: bool,
}

impl MobSnapshot {
    /// Plain, non-persistent mob in the given world and chunk
    pub fn new(kind: MobKind, world: WorldId, chunk: ChunkCoord) -> Self {
        Self {
            id: MobId::new(),
            kind,
            world,
            chunk,
            custom_name: None,
            custom_name_visible: false,
            persistent: false,
            tamed: false,
            dyed: false,
            player_created: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn name_visible(mut self) -> Self {
        self.custom_name_visible = true;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn tamed(mut self) -> Self {
        self.tamed = true;
        self
    }

    pub fn dyed(mut self) -> Self {
        self.dyed = true;
        self
    }

    pub fn player_created(mut self) -> Self {
        self.player_created = true;
        self
    }

    /// Has a visible or stored custom name
    pub fn is_named(&self) -> bool {
        self.custom_name.is_some() || self.custom_name_visible
    }
}
