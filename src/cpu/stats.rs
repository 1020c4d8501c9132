/*!
 * Lock-Free CPU Statistics
 * Atomic counters updated on every quantum and interrupt
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic CPU counters
///
/// All operations use relaxed ordering; snapshots are not synchronized
/// with each other.
#[derive(Debug, Default)]
pub(crate) struct AtomicCpuStats {
    quanta: AtomicU64,
    commits: AtomicU64,
    discarded_writes: AtomicU64,
    interrupts: AtomicU64,
}

impl AtomicCpuStats {
    #[inline]
    pub fn record_quantum(&self, commits: u64, discarded: u64) {
        self.quanta.fetch_add(1, Ordering::Relaxed);
        self.commits.fetch_add(commits, Ordering::Relaxed);
        self.discarded_writes.fetch_add(discarded, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_interrupts(&self) {
        self.interrupts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CpuStats {
        CpuStats {
            quanta: self.quanta.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            discarded_writes: self.discarded_writes.load(Ordering::Relaxed),
            interrupts: self.interrupts.load(Ordering::Relaxed),
        }
    }
}

/// CPU statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CpuStats {
    /// Step function invocations
    pub quanta: u64,
    /// Successful `commit` calls
    pub commits: u64,
    /// Staged writes dropped at quantum end
    pub discarded_writes: u64,
    /// `cancel` / `cancel_blocked` calls
    pub interrupts: u64,
}
