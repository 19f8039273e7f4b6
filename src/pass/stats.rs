//! Hard-cap run statistics

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Passes that found an overage and culled
    pub executions: u64,
    /// Passes where the hotspot stage fired
    pub penalty_purges: u64,
    pub average_ms: f64,
    pub last_ms: f64,
}

impl RunStatistics {
    /// Fold one culling run into the running average
    pub fn record(&mut self, elapsed: Duration, penalty_purge: bool) {
        let n = self.executions as f64;
        let ms = elapsed.as_secs_f64() * 1000.0;

        self.last_ms = ms;
        self.average_ms = self.average_ms * (n / (n + 1.0)) + ms / (n + 1.0);
        self.executions += 1;
        if penalty_purge {
            self.penalty_purges += 1;
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hard Cap Cull Statistics:")?;
        writeln!(f, "Hard Cap Cull Execution count: {}", self.executions)?;
        writeln!(f, "Number of culls with penalty purges: {}", self.penalty_purges)?;
        writeln!(f, "Average time per execution: {:.2} milliseconds", self.average_ms)?;
        writeln!(f, "Execution time for last execution: {:.2} milliseconds", self.last_ms)
    }
}
