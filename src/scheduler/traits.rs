/*!
 * Scheduler Traits
 * Interface every scheduling policy implements
 */

use super::types::SchedulerStats;
use crate::core::types::KernelResult;
use crate::cpu::Cpu;
use crate::process::ProcessTable;

/// A scheduling policy that owns the kernel's run loop
pub trait Scheduler: Send + Sync {
    /// Short policy name used in logs
    fn name(&self) -> &'static str;

    /// Drive `procs` through `cpu` until the policy decides no work remains
    fn schedule(&self, cpu: &Cpu, procs: &ProcessTable) -> KernelResult<SchedulerStats>;
}
