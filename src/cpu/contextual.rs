/*!
 * Execution Context
 * Per-quantum view of a process: reads, staged writes, commit, system calls
 */

use crate::core::types::{Pid, Priority, SlotIndex};
use crate::memory::{Content, Memory, MemoryResult};
use crate::process::{Process, ProcessTable, Status};
use std::collections::BTreeMap;

/// Context handed to a step function for one quantum
///
/// Writes are staged here and reach process memory only through
/// [`commit`](Self::commit). Whatever is still staged when the quantum
/// ends is dropped with the context.
pub struct Contextual<'a> {
    process: &'a mut Process,
    os: &'a ProcessTable,
    staged: BTreeMap<SlotIndex, Content>,
    commits: u64,
}

impl<'a> Contextual<'a> {
    pub(crate) fn new(process: &'a mut Process, os: &'a ProcessTable) -> Self {
        Self {
            process,
            os,
            staged: BTreeMap::new(),
            commits: 0,
        }
    }

    pub fn pid(&self) -> Pid {
        self.process.pid()
    }

    pub fn name(&self) -> &str {
        self.process.name()
    }

    pub fn priority(&self) -> Priority {
        self.process.priority()
    }

    /// Quanta completed before this one
    pub fn pc(&self) -> u64 {
        self.process.pc()
    }

    /// Committed memory
    pub fn memory(&self) -> &Memory {
        self.process.memory()
    }

    /// Committed content of a slot
    pub fn read(&self, index: SlotIndex) -> MemoryResult<&Content> {
        self.process.memory().read(index)
    }

    /// Staged content of a slot if any, committed content otherwise
    pub fn read_latest(&self, index: SlotIndex) -> MemoryResult<&Content> {
        let committed = self.process.memory().read(index)?;
        Ok(self.staged.get(&index).unwrap_or(committed))
    }

    /// Stage a write
    pub fn write(&mut self, index: SlotIndex, content: impl Into<Content>) -> MemoryResult<()> {
        self.process.memory().check(index)?;
        self.staged.insert(index, content.into());
        Ok(())
    }

    /// Stage a read-modify-write against the latest content of a slot
    pub fn update<F>(&mut self, index: SlotIndex, f: F) -> MemoryResult<()>
    where
        F: FnOnce(&Content) -> Content,
    {
        let next = f(self.read_latest(index)?);
        self.staged.insert(index, next);
        Ok(())
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Drop every staged write
    pub fn discard(&mut self) -> usize {
        let dropped = self.staged.len();
        self.staged.clear();
        dropped
    }

    /// Apply every staged write to process memory
    ///
    /// Returns how many slots were written.
    pub fn commit(&mut self) -> usize {
        let staged = std::mem::take(&mut self.staged);
        let mut applied = 0;
        for (index, content) in staged {
            // indexes were bounds-checked when staged
            if self.process.memory.store(index, content).is_ok() {
                applied += 1;
            }
        }
        self.commits += 1;
        applied
    }

    pub(crate) fn commits(&self) -> u64 {
        self.commits
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
        self.os.create(name, priority, slots, step)
    }

    /// System call: park this process when the quantum ends
    pub fn running_to_blocked(&self) -> bool {
        self.os.running_to_blocked()
    }

    /// System call: wake a blocked process by name
    pub fn blocked_to_ready(&self, name: &str) -> bool {
        self.os.blocked_to_ready(name)
    }

    /// Handle to the kernel's process table
    pub fn os(&self) -> &ProcessTable {
        self.os
    }
}
