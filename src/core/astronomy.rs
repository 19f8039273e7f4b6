//! Lunar cycle used to modulate hostile cull aggression
//!
//! World time is measured in ticks; a day is 24000 ticks and the moon runs
//! through an 8-day cycle. The cycle amplitude is 1.0 at full moon and 0.0
//! at new moon.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Constants
// ============================================================================

/// Number of world ticks per day
pub const TICKS_PER_DAY: u64 = 24_000;

/// Lunar period in days
pub const LUNAR_CYCLE_DAYS: u64 = 8;

// ============================================================================
// Enums
// ============================================================================

/// Moon phase - 8 phases, one per day of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
}

impl MoonPhase {
    /// Get the moon phase for an absolute world time
    pub fn from_full_time(full_time: u64) -> Self {
        match (full_time / TICKS_PER_DAY) % LUNAR_CYCLE_DAYS {
            0 => MoonPhase::Full,
            1 => MoonPhase::WaningGibbous,
            2 => MoonPhase::LastQuarter,
            3 => MoonPhase::WaningCrescent,
            4 => MoonPhase::New,
            5 => MoonPhase::WaxingCrescent,
            6 => MoonPhase::FirstQuarter,
            _ => MoonPhase::WaxingGibbous,
        }
    }
}

/// Fractional days elapsed since world creation
pub fn elapsed_days(full_time: u64) -> f64 {
    full_time as f64 / TICKS_PER_DAY as f64
}

/// Cycle amplitude in [0.0, 1.0]: 1.0 at full moon, 0.0 at new moon
pub fn lunar_amplitude(full_time: u64) -> f64 {
    let days = elapsed_days(full_time);
    (1.0 + (days * 2.0 * PI / LUNAR_CYCLE_DAYS as f64).cos()) / 2.0
}
