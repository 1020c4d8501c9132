/*!
 * Scheduler Types
 * Policy selection and run statistics
 */

use super::fcfs::FcfsScheduler;
use super::noop::NoScheduler;
use super::traits::Scheduler;
use crate::core::errors::SchedulerError;
use crate::process::Placement;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Scheduling policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Run every ready process once, then stop
    #[default]
    None,
    /// First-come-first-served until no work remains
    Fcfs,
}

impl Policy {
    /// Instantiate the scheduler for this policy
    pub fn build(self, idle_timeout: Option<Duration>) -> Arc<dyn Scheduler> {
        match self {
            Policy::None => Arc::new(NoScheduler),
            Policy::Fcfs => Arc::new(FcfsScheduler::new().with_idle_timeout(idle_timeout)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Policy::None => "none",
            Policy::Fcfs => "fcfs",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "noop" => Ok(Policy::None),
            "fcfs" | "fifo" => Ok(Policy::Fcfs),
            other => Err(SchedulerError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Statistics for one scheduler run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub policy: Policy,
    /// Quanta dispatched
    pub quanta: u64,
    /// Processes that reached Done
    pub exited: u64,
    /// Quanta that ended back in the ready queue
    pub requeued: u64,
    /// Quanta that ended in the blocked set
    pub blocked: u64,
    /// Times the scheduler parked waiting for a wake-up
    pub idle_waits: u64,
}

impl SchedulerStats {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            quanta: 0,
            exited: 0,
            requeued: 0,
            blocked: 0,
            idle_waits: 0,
        }
    }

    /// Account for one finished quantum
    pub fn record(&mut self, placement: Placement) {
        self.quanta += 1;
        match placement {
            Placement::Exited => self.exited += 1,
            Placement::Requeued => self.requeued += 1,
            Placement::Blocked => self.blocked += 1,
        }
    }
}
