/*!
 * Kernel
 * Aggregates the CPU, memory, devices, process table and scheduler, and
 * exposes the system-call surface to host code
 */

pub mod devices;

pub use devices::{Device, DeviceTable};

use crate::core::config::{KernelConfig, NOOP_PRIORITY, NOOP_PROCESS_NAME};
use crate::core::types::{KernelResult, Pid, Priority};
use crate::cpu::{Contextual, Cpu};
use crate::memory::Memory;
use crate::monitoring::run_span;
use crate::process::{ProcessTable, Status};
use crate::scheduler::{Scheduler, SchedulerStats};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

/// The simulated operating system
///
/// Cheap to clone; clones share all state, so a host thread can wake or
/// interrupt processes while another thread is inside [`run`](Self::run).
#[derive(Clone)]
pub struct Kernel {
    cpu: Cpu,
    memory: Memory,
    devices: DeviceTable,
    procs: ProcessTable,
    scheduler: Arc<RwLock<Arc<dyn Scheduler>>>,
    config: KernelConfig,
}

impl Kernel {
    /// Kernel with default configuration: one no-op process and the
    /// no-op scheduler
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    pub fn with_config(config: KernelConfig) -> Self {
        let procs = ProcessTable::new();
        procs.create(NOOP_PROCESS_NAME, NOOP_PRIORITY, 0, |_| Status::Done);

        let scheduler = config.policy.build(config.idle_timeout);
        info!(
            scheduler = scheduler.name(),
            memory_slots = config.memory_slots,
            "kernel initialized"
        );

        Self {
            cpu: Cpu::new(procs.clone()),
            memory: Memory::new(config.memory_slots),
            devices: DeviceTable::new(),
            procs,
            scheduler: Arc::new(RwLock::new(scheduler)),
            config,
        }
    }

    /// Replace the active scheduler; takes effect on the next `run`
    pub fn set_scheduler(&self, scheduler: impl Scheduler + 'static) {
        info!(scheduler = scheduler.name(), "scheduler replaced");
        *self.scheduler.write() = Arc::new(scheduler);
    }

    pub fn with_scheduler(self, scheduler: impl Scheduler + 'static) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    /// Start the active scheduler and block until it exits
    pub fn run(&self) -> KernelResult<SchedulerStats> {
        let scheduler = self.scheduler.read().clone();
        let span = run_span(scheduler.name());
        let _entered = span.enter();

        info!(processes = self.procs.len(), "OS run: start scheduler");
        let result = scheduler.schedule(&self.cpu, &self.procs);

        match &result {
            Ok(stats) => info!(
                quanta = stats.quanta,
                exited = stats.exited,
                remaining = self.procs.len(),
                "scheduler exit, shutting down"
            ),
            Err(e) => error!(error = %e, "scheduler failed"),
        }
        result
    }

    /// System call: spawn a process
    pub fn create_process<F>(
        &self,
        name: impl Into<String>,
        priority: Priority,
        slots: usize,
        step: F,
    ) -> Pid
    where
        F: Fn(&mut Contextual<'_>) -> Status + Send + Sync + 'static,
    {
        self.procs.create(name, priority, slots, step)
    }

    /// System call: park the running process when its quantum ends
    pub fn running_to_blocked(&self) -> bool {
        self.procs.running_to_blocked()
    }

    /// System call: wake a blocked process by name
    pub fn blocked_to_ready(&self, name: &str) -> bool {
        self.procs.blocked_to_ready(name)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.procs
    }

    /// Kernel-owned memory
    ///
    /// Sized from `KernelConfig::memory_slots` at boot and read-only
    /// afterwards; processes write only to their own memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn devices(&self) -> &DeviceTable {
        &self.devices
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn scheduler_name(&self) -> &'static str {
        self.scheduler.read().name()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}
