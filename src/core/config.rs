//! Culling configuration with documented constants
//!
//! Every tunable the passes read is collected here, with an explanation
//! of what it does and how it interacts with the others. Values are loaded
//! from TOML; missing keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CullError, Result};

/// Configuration for the culling passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullConfig {
    // === HARD CAP ===
    /// Strategy name used by both passes: "random" or "priority" (any case)
    ///
    /// Kept as a raw string so an operator typo degrades to a logged
    /// warning and a no-op pass instead of a failed reload.
    pub strategy: String,

    /// Fraction of the total population a single 7x7 chunk window may hold
    /// before it is penalized (0.0 - 1.0)
    ///
    /// At 0.5, a window has to contain more than half of every live mob
    /// before the hotspot stage takes a share of the budget.
    pub hotspot_penalty_threshold: f64,

    /// Damage intensity passed with every removal request
    ///
    /// 100 is enough to kill any ordinary mob outright.
    pub cull_damage: u32,

    /// Overage above which a hard-cap pass logs a warning
    pub exceptional_cull_warning: usize,

    // === HOSTILE SOFT CAP ===
    /// Whether the hostile soft-cap pass runs at all
    pub monster_cull_to_spawn_enabled: bool,

    /// Aggression at the trough of the lunar cycle (percent of the spawn limit
    /// that is culled away)
    pub min_monster_cull_aggression: u32,

    /// Aggression at the peak of the lunar cycle (percent)
    pub max_monster_cull_aggression: u32,

    /// Upper bound on one pass, as a percent of the current hostile count
    ///
    /// At 25, a world with 80 hostiles loses at most 20 per pass no matter
    /// how far above the target it is.
    pub max_monster_cull_per_pass: u32,

    /// Random spread added to the aggression each pass (+/- percentage points)
    ///
    /// The result is clamped back into [min, max], so 0 keeps the cycle exact.
    pub aggression_jitter: u32,
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            strategy: "priority".to_string(),
            hotspot_penalty_threshold: 0.5,
            cull_damage: 100,
            exceptional_cull_warning: 100,

            monster_cull_to_spawn_enabled: true,
            min_monster_cull_aggression: 0,
            max_monster_cull_aggression: 10,
            max_monster_cull_per_pass: 25,
            aggression_jitter: 0,
        }
    }
}

impl CullConfig {
    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: CullConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.hotspot_penalty_threshold) {
            return Err(CullError::InvalidConfig(format!(
                "hotspot_penalty_threshold ({}) must be within 0.0..=1.0",
                self.hotspot_penalty_threshold
            )));
        }

        if self.cull_damage == 0 {
            return Err(CullError::InvalidConfig("cull_damage must be positive".into()));
        }

        for (name, value) in [
            ("min_monster_cull_aggression", self.min_monster_cull_aggression),
            ("max_monster_cull_aggression", self.max_monster_cull_aggression),
            ("max_monster_cull_per_pass", self.max_monster_cull_per_pass),
        ] {
            if value > 100 {
                return Err(CullError::InvalidConfig(format!(
                    "{} ({}) is a percentage and must be <= 100",
                    name, value
                )));
            }
        }

        if self.min_monster_cull_aggression > self.max_monster_cull_aggression {
            return Err(CullError::InvalidConfig(format!(
                "min_monster_cull_aggression ({}) should be <= max_monster_cull_aggression ({})",
                self.min_monster_cull_aggression, self.max_monster_cull_aggression
            )));
        }

        Ok(())
    }
}
