//! Hard-cap pass
//!
//! Removes exactly the live population above the hard cap, then hands over
//! to the hostile soft cap.

use std::time::Instant;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cull::{
    cull_by_priority, cull_hotspot, cull_in_order, ChunkPopulationIndex, CullSession, CullStrategy,
    Hotspot,
};
use crate::pass::{Culler, HostileReport, PassOutcome, PassType};
use crate::world::MobWorld;

/// What a hard-cap pass did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardCapReport {
    /// Population above the cap when the pass started
    pub overage: i64,
    /// Strategy resolved from config, `None` when unrecognized or idle
    pub strategy: Option<CullStrategy>,
    pub hotspot: Option<Hotspot>,
    pub hotspot_removals: usize,
    pub removals: usize,
    /// Budget left when candidates ran out
    pub unused_budget: usize,
    pub hostile: PassOutcome<HostileReport>,
}

impl<W: MobWorld, R: Rng> Culler<W, R> {
    /// Run one hard-cap pass. A trigger that arrives while another hard-cap
    /// pass is running returns [`PassOutcome::Skipped`] immediately.
    pub fn run_hard_cap_pass(&self) -> PassOutcome<HardCapReport> {
        let guard = self.guard(PassType::HardCap);
        let Some(_running) = guard.try_acquire() else {
            debug!(guard = guard.name(), "pass already running, skipping");
            return PassOutcome::Skipped;
        };

        if self.is_paused(PassType::HardCap) {
            debug!("hard cap pass paused");
            return PassOutcome::Paused;
        }

        let config = self.config();
        let overage = self.world.current_overage();
        let mut report = HardCapReport {
            overage,
            strategy: None,
            hotspot: None,
            hotspot_removals: 0,
            removals: 0,
            unused_budget: 0,
            hostile: PassOutcome::Skipped,
        };

        if overage > 0 {
            let started = Instant::now();
            let budget = overage as usize;

            if budget > config.exceptional_cull_warning {
                warn!(overage, "exceptional culling, required to cull {} mobs", overage);
            }

            let mobs = self.world.all_candidate_mobs();
            let mut session = CullSession::new(&self.world, config.cull_damage);
            let strategy = CullStrategy::from_name(&config.strategy);

            report.unused_budget = match strategy {
                Some(CullStrategy::Random) => cull_in_order(&mut session, &mobs, budget),
                Some(CullStrategy::Priority) => {
                    let mut rng = self.lock_rng(PassType::HardCap);
                    let index = ChunkPopulationIndex::build(&mobs, |m| session.is_candidate(m));
                    let outcome = cull_hotspot(
                        &mut session,
                        &index,
                        budget,
                        config.hotspot_penalty_threshold,
                        &mut *rng,
                    );
                    report.hotspot = outcome.hotspot;
                    report.hotspot_removals = outcome.culled;
                    debug!(
                        hotspot_removals = outcome.culled,
                        remaining = outcome.remaining_budget,
                        "hotspot stage done"
                    );

                    cull_by_priority(&mut session, &mobs, outcome.remaining_budget, &mut *rng)
                }
                None => {
                    warn!(
                        strategy = %config.strategy,
                        "cannot determine culling strategy, no work to do"
                    );
                    budget
                }
            };

            report.strategy = strategy;
            report.removals = session.removals();

            let elapsed = started.elapsed();
            self.record_run(elapsed, report.hotspot.is_some());
            info!(
                overage,
                removals = report.removals,
                unused = report.unused_budget,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "hard cap pass culled"
            );
        }

        report.hostile = self.run_hostile_soft_cap_pass();
        PassOutcome::Completed(report)
    }
}
