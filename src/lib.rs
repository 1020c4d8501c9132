/*!
 * Sham Kernel Library
 * Simulated single-core multiprogrammed kernel: processes, quanta with
 * transactional memory commits, blocking, interrupts and scheduling
 */

pub mod core;
pub mod cpu;
pub mod kernel;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod scheduler;

// Re-exports
pub use crate::core::{
    ConfigError, KernelConfig, KernelError, KernelResult, Pid, Priority, SchedulerError,
    SlotIndex,
};
pub use cpu::{Contextual, Cpu, CpuStats};
pub use kernel::{Device, DeviceTable, Kernel};
pub use memory::{Content, Memory, MemoryError, MemoryResult, Slot};
pub use monitoring::{init_tracing, init_tracing_with, TraceFormat};
pub use process::{
    Placement, Process, ProcessError, ProcessInfo, ProcessTable, Queue, Status, StepFn,
};
pub use scheduler::{FcfsScheduler, NoScheduler, Policy, Scheduler, SchedulerStats};
