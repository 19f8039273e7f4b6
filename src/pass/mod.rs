//! Periodic culling passes
//!
//! [`Culler`] owns everything a pass needs between invocations: the world
//! collaborator, the live config, the run statistics, and one guard, pause
//! switch and random source per pass type. The host scheduler calls
//! [`Culler::run_hard_cap_pass`] and, optionally on its own timer,
//! [`Culler::run_hostile_soft_cap_pass`].

pub mod guard;
pub mod hard_cap;
pub mod hostile;
pub mod stats;

pub use guard::{ExecutionGuard, RunningPass};
pub use hard_cap::HardCapReport;
pub use hostile::{AggressionCycle, HostileReport, WorldCullReport};
pub use stats::RunStatistics;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LockResult, Mutex, MutexGuard, RwLock};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::CullConfig;
use crate::core::error::Result;
use crate::world::MobWorld;

static LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

/// Recover the inner value of a poisoned lock, warning once per process
fn recover<T>(result: LockResult<T>, operation: &'static str) -> T {
    result.unwrap_or_else(|poisoned| {
        if LOCK_POISON_WARNED
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            warn!(operation, "culler lock poisoned; recovered inner value");
        }
        poisoned.into_inner()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassType {
    HardCap,
    HostileSoftCap,
}

/// What one trigger of a pass did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PassOutcome<T> {
    Completed(T),
    /// Another pass of the same type was running
    Skipped,
    Paused,
    /// Turned off in config
    Disabled,
}

impl<T> PassOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            PassOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PassOutcome::Skipped)
    }
}

pub struct Culler<W, R = ChaCha8Rng> {
    world: W,
    config: RwLock<CullConfig>,
    hard_cap_paused: AtomicBool,
    hostile_paused: AtomicBool,
    hard_cap_guard: ExecutionGuard,
    hostile_guard: ExecutionGuard,
    stats: RwLock<RunStatistics>,
    hard_cap_rng: Mutex<R>,
    hostile_rng: Mutex<R>,
}

impl<W: MobWorld> Culler<W, ChaCha8Rng> {
    /// Culler with entropy-seeded random sources
    pub fn new(world: W, config: CullConfig) -> Result<Self> {
        Self::with_rng(world, config, ChaCha8Rng::from_entropy(), ChaCha8Rng::from_entropy())
    }

    /// Culler with a fixed seed, for reproducible runs. The hostile pass
    /// draws from a separate stream of the same seed.
    pub fn seeded(world: W, config: CullConfig, seed: u64) -> Result<Self> {
        let hard_cap_rng = ChaCha8Rng::seed_from_u64(seed);
        let mut hostile_rng = ChaCha8Rng::seed_from_u64(seed);
        hostile_rng.set_stream(1);
        Self::with_rng(world, config, hard_cap_rng, hostile_rng)
    }
}

impl<W: MobWorld, R: Rng> Culler<W, R> {
    pub fn with_rng(world: W, config: CullConfig, hard_cap_rng: R, hostile_rng: R) -> Result<Self> {
        config.validate()?;
        info!(strategy = %config.strategy, "culler initialized");

        Ok(Self {
            world,
            config: RwLock::new(config),
            hard_cap_paused: AtomicBool::new(false),
            hostile_paused: AtomicBool::new(false),
            hard_cap_guard: ExecutionGuard::new("hard_cap"),
            hostile_guard: ExecutionGuard::new("hostile_soft_cap"),
            stats: RwLock::new(RunStatistics::default()),
            hard_cap_rng: Mutex::new(hard_cap_rng),
            hostile_rng: Mutex::new(hostile_rng),
        })
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Snapshot of the current config
    pub fn config(&self) -> CullConfig {
        recover(self.config.read(), "config_read").clone()
    }

    /// Replace the config; takes effect from the next pass
    pub fn set_config(&self, config: CullConfig) -> Result<()> {
        config.validate()?;
        *recover(self.config.write(), "config_write") = config;
        Ok(())
    }

    fn pause_switch(&self, pass: PassType) -> &AtomicBool {
        match pass {
            PassType::HardCap => &self.hard_cap_paused,
            PassType::HostileSoftCap => &self.hostile_paused,
        }
    }

    pub fn pause(&self, pass: PassType) {
        self.pause_switch(pass).store(true, Ordering::Release);
        info!(?pass, "culling paused");
    }

    pub fn resume(&self, pass: PassType) {
        self.pause_switch(pass).store(false, Ordering::Release);
        info!(?pass, "culling resumed");
    }

    pub fn is_paused(&self, pass: PassType) -> bool {
        self.pause_switch(pass).load(Ordering::Acquire)
    }

    fn guard(&self, pass: PassType) -> &ExecutionGuard {
        match pass {
            PassType::HardCap => &self.hard_cap_guard,
            PassType::HostileSoftCap => &self.hostile_guard,
        }
    }

    pub fn is_running(&self, pass: PassType) -> bool {
        self.guard(pass).is_running()
    }

    pub fn statistics(&self) -> RunStatistics {
        *recover(self.stats.read(), "stats_read")
    }

    /// Statistics as display text
    pub fn statistics_report(&self) -> String {
        self.statistics().to_string()
    }

    fn record_run(&self, elapsed: std::time::Duration, penalty_purge: bool) {
        recover(self.stats.write(), "stats_write").record(elapsed, penalty_purge);
    }

    /// Random source of one pass type; passes of different types never contend
    fn lock_rng(&self, pass: PassType) -> MutexGuard<'_, R> {
        match pass {
            PassType::HardCap => recover(self.hard_cap_rng.lock(), "hard_cap_rng_lock"),
            PassType::HostileSoftCap => recover(self.hostile_rng.lock(), "hostile_rng_lock"),
        }
    }
}
