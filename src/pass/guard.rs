//! Single-flight guard for a pass type
//!
//! A pass holds a [`RunningPass`] token for its whole run. Dropping the
//! token releases the guard on every exit path, including unwinding.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct ExecutionGuard {
    name: &'static str,
    running: AtomicBool,
}

impl ExecutionGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: AtomicBool::new(false),
        }
    }

    /// Claim the guard, or `None` if a pass of this type is already running
    pub fn try_acquire(&self) -> Option<RunningPass<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RunningPass { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Proof that the owning pass is the only one running
#[derive(Debug)]
pub struct RunningPass<'g> {
    guard: &'g ExecutionGuard,
}

impl Drop for RunningPass<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}
