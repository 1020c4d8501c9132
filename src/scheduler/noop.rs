/*!
 * No-op Scheduler
 * Gives every process that is ready at entry a single quantum
 */

use super::traits::Scheduler;
use super::types::{Policy, SchedulerStats};
use crate::core::types::KernelResult;
use crate::cpu::Cpu;
use crate::process::ProcessTable;
use tracing::debug;

/// Boot-time scheduler
///
/// Processes created or woken during the pass wait for the next run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScheduler;

impl Scheduler for NoScheduler {
    fn name(&self) -> &'static str {
        Policy::None.as_str()
    }

    fn schedule(&self, cpu: &Cpu, procs: &ProcessTable) -> KernelResult<SchedulerStats> {
        let mut stats = SchedulerStats::new(Policy::None);
        let pending = procs.ready_len();
        debug!(pending, "single pass over ready queue");

        for _ in 0..pending {
            let Some(mut process) = procs.dispatch() else {
                break;
            };
            let status = cpu.execute(&mut process);
            stats.record(procs.settle(process, status));
        }

        Ok(stats)
    }
}
