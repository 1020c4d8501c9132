/*!
 * FCFS Scheduler
 * First-come-first-served dispatch, one quantum per dispatch
 */

use super::traits::Scheduler;
use super::types::{Policy, SchedulerStats};
use crate::core::errors::SchedulerError;
use crate::core::types::KernelResult;
use crate::cpu::Cpu;
use crate::process::{ProcessTable, Wakeup};
use std::time::Duration;
use tracing::warn;

/// First-come-first-served scheduler
///
/// Pops the head of the ready queue, runs one quantum, routes the result
/// and repeats. Priority has no effect. While the ready queue is empty but
/// blocked processes remain, the scheduler parks until one is woken, with
/// no deadline unless one is configured; it returns once nothing is ready,
/// blocked or running.
#[derive(Debug, Clone, Copy)]
pub struct FcfsScheduler {
    idle_timeout: Option<Duration>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self { idle_timeout: None }
    }

    /// How long to park with everything blocked; `None` parks forever
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl Default for FcfsScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        Policy::Fcfs.as_str()
    }

    fn schedule(&self, cpu: &Cpu, procs: &ProcessTable) -> KernelResult<SchedulerStats> {
        let mut stats = SchedulerStats::new(Policy::Fcfs);

        loop {
            if let Some(mut process) = procs.dispatch() {
                let status = cpu.execute(&mut process);
                stats.record(procs.settle(process, status));
                continue;
            }

            match procs.wait_for_work(self.idle_timeout) {
                Wakeup::Ready => stats.idle_waits += 1,
                Wakeup::Drained => break,
                Wakeup::TimedOut { blocked } => {
                    warn!(blocked, timeout = ?self.idle_timeout, "scheduler stalled");
                    return Err(SchedulerError::Stalled { blocked }.into());
                }
            }
        }

        Ok(stats)
    }
}
