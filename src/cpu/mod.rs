/*!
 * CPU
 * Single-core quantum execution and asynchronous interrupts
 */

pub mod contextual;
pub mod stats;

pub use contextual::Contextual;
pub use stats::CpuStats;

use crate::monitoring::tracer::quantum_span;
use crate::process::{Process, ProcessTable, Queue, Status};
use stats::AtomicCpuStats;
use std::sync::Arc;
use tracing::{debug, info};

/// The simulated CPU
///
/// Cheap to clone; clones share counters and the process table, so an
/// interrupt can be raised from any thread.
#[derive(Clone)]
pub struct Cpu {
    procs: ProcessTable,
    stats: Arc<AtomicCpuStats>,
}

impl Cpu {
    pub fn new(procs: ProcessTable) -> Self {
        Self {
            procs,
            stats: Arc::new(AtomicCpuStats::default()),
        }
    }

    /// Run one quantum of `process`
    ///
    /// Invokes the step function exactly once. Writes left uncommitted
    /// are discarded. `pc` advances by one unless the step returned `Done`.
    pub fn execute(&self, process: &mut Process) -> Status {
        let step = process.step();
        let span = quantum_span(process.pid(), process.name(), process.pc());
        let _entered = span.enter();

        let (status, commits, discarded) = {
            let mut ctx = Contextual::new(process, &self.procs);
            let status = step(&mut ctx);
            (status, ctx.commits(), ctx.staged_len() as u64)
        };

        if discarded > 0 {
            debug!(discarded, "uncommitted writes discarded");
        }
        if !status.is_terminal() {
            process.pc += 1;
        }

        self.stats.record_quantum(commits, discarded);
        debug!(status = %status, pc = process.pc(), commits, "quantum finished");
        status
    }

    /// Interrupt the ready queue, forcing every ready process to `target`
    pub fn cancel(&self, target: Status) -> usize {
        self.interrupt(Queue::Ready, target)
    }

    /// Interrupt the blocked set, forcing every blocked process to `target`
    pub fn cancel_blocked(&self, target: Status) -> usize {
        self.interrupt(Queue::Blocked, target)
    }

    fn interrupt(&self, source: Queue, target: Status) -> usize {
        self.stats.inc_interrupts();
        let count = self.procs.cancel(source, target);
        info!(source = ?source, target = %target, count, "cpu interrupt");
        count
    }

    pub fn stats(&self) -> CpuStats {
        self.stats.snapshot()
    }
}
