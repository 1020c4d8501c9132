/*!
 * Process Control Block
 */

use super::types::{ProcessInfo, Status, StepFn};
use crate::core::types::{Pid, Priority};
use crate::memory::Memory;
use std::fmt;

/// A schedulable unit of execution
///
/// Carries everything a quantum needs: identity, private memory, the step
/// counter and the step function itself. The CPU is the only writer of
/// `pc` and `memory`.
pub struct Process {
    pid: Pid,
    name: String,
    priority: Priority,
    pub(crate) memory: Memory,
    pub(crate) pc: u64,
    pub(crate) status: Status,
    step: StepFn,
}

impl Process {
    pub(crate) fn new(
        pid: Pid,
        name: String,
        priority: Priority,
        slots: usize,
        step: StepFn,
    ) -> Self {
        Self {
            pid,
            name,
            priority,
            memory: Memory::new(slots),
            pc: 0,
            status: Status::Ready,
            step,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn pc(&self) -> u64 {
        self.pc
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn step(&self) -> StepFn {
        self.step.clone()
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            name: self.name.clone(),
            priority: self.priority,
            pc: self.pc,
            status: self.status,
            memory_slots: self.memory.len(),
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("pc", &self.pc)
            .field("status", &self.status)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}
