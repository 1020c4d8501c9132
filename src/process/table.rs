/*!
 * Process Table
 * Lock-guarded owner of every process and of the ready/blocked queues
 *
 * All queue transitions happen under a single mutex that is held only for
 * the transition itself. The process being executed is checked out into
 * the running slot, so a quantum runs without the lock and may re-enter
 * the table through system calls.
 */

use super::pcb::Process;
use super::types::{
    Placement, ProcessError, ProcessInfo, ProcessResult, Queue, Status, StepFn, Wakeup,
};
use crate::core::types::{Pid, Priority};
use crate::cpu::Contextual;
use crate::memory::Memory;
use ahash::RandomState;
use parking_lot::{Condvar, Mutex};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// The process currently inside a quantum
#[derive(Debug)]
struct RunningSlot {
    info: ProcessInfo,
    block_requested: bool,
}

#[derive(Debug, Default)]
struct TableState {
    // Every registered process except the running one
    processes: HashMap<Pid, Process, RandomState>,
    ready: VecDeque<Pid>,
    blocked: BTreeSet<Pid>,
    running: Option<RunningSlot>,
    next_pid: Pid,
}

impl TableState {
    fn blocked_by_name(&self, name: &str) -> Option<Pid> {
        self.blocked
            .iter()
            .copied()
            .find(|pid| self.processes.get(pid).is_some_and(|p| p.name() == name))
    }

    /// Next free pid; wraps to 1 after `Pid::MAX`, skipping live pids
    fn allocate_pid(&mut self) -> Pid {
        loop {
            let pid = self.next_pid;
            self.next_pid = pid.checked_add(1).unwrap_or(1);
            let live = self.processes.contains_key(&pid)
                || self.running.as_ref().is_some_and(|slot| slot.info.pid == pid);
            if !live {
                return pid;
            }
        }
    }

    fn wake(&mut self, pid: Pid) -> bool {
        if !self.blocked.remove(&pid) {
            return false;
        }
        if let Some(process) = self.processes.get_mut(&pid) {
            process.status = Status::Ready;
        }
        self.ready.push_back(pid);
        true
    }

    fn withdraw_block(&mut self, matches: impl Fn(&ProcessInfo) -> bool) -> bool {
        match self.running.as_mut() {
            Some(slot) if slot.block_requested && matches(&slot.info) => {
                slot.block_requested = false;
                true
            }
            _ => false,
        }
    }
}

struct Shared {
    state: Mutex<TableState>,
    work: Condvar,
}

/// Process table and queue manager
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct ProcessTable {
    inner: Arc<Shared>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(TableState {
                    next_pid: 1,
                    ..TableState::default()
                }),
                work: Condvar::new(),
            }),
        }
    }

    /// Register a new process and append it to the ready queue
    pub fn create<F>(
        &self,
        name: impl Into<String>,
        priority: Priority,
        slots: usize,
        step: F,
    ) -> Pid
    where
        F: Fn(&mut Contextual<'_>) -> Status + Send + Sync + 'static,
    {
        self.create_with(name, priority, slots, Arc::new(step))
    }

    /// Same as [`create`](Self::create) with a shared step function
    pub fn create_with(
        &self,
        name: impl Into<String>,
        priority: Priority,
        slots: usize,
        step: StepFn,
    ) -> Pid {
        let name = name.into();
        let mut state = self.inner.state.lock();
        let pid = state.allocate_pid();

        state
            .processes
            .insert(pid, Process::new(pid, name.clone(), priority, slots, step));
        state.ready.push_back(pid);
        let ready = state.ready.len();
        drop(state);

        self.inner.work.notify_all();
        info!(pid, name = %name, priority, slots, ready, "process created");
        pid
    }

    /// Pop the head of the ready queue into the running slot
    ///
    /// Returns `None` while another process is checked out; at most one
    /// process runs at a time and the occupant must be settled first.
    pub fn dispatch(&self) -> Option<Process> {
        let mut state = self.inner.state.lock();
        if let Some(slot) = state.running.as_ref() {
            error!(
                running = slot.info.pid,
                ready = state.ready.len(),
                "dispatch refused: a process is already running"
            );
            return None;
        }
        while let Some(pid) = state.ready.pop_front() {
            let Some(mut process) = state.processes.remove(&pid) else {
                continue;
            };
            process.status = Status::Running;
            state.running = Some(RunningSlot {
                info: process.info(),
                block_requested: false,
            });
            debug!(pid, name = process.name(), pc = process.pc(), "process dispatched");
            return Some(process);
        }
        None
    }

    /// Route a process back after its quantum
    ///
    /// `Done` wins over a pending block request. A step that returns
    /// `Blocked` is treated as having requested blocking.
    pub fn settle(&self, mut process: Process, returned: Status) -> Placement {
        let mut state = self.inner.state.lock();
        let block_requested = match state.running.take() {
            Some(slot) if slot.info.pid == process.pid() => slot.block_requested,
            other => {
                state.running = other;
                false
            }
        };

        let pid = process.pid();
        let placement = if returned.is_terminal() {
            process.status = Status::Done;
            Placement::Exited
        } else if block_requested || returned == Status::Blocked {
            process.status = Status::Blocked;
            state.blocked.insert(pid);
            state.processes.insert(pid, process);
            Placement::Blocked
        } else {
            process.status = Status::Ready;
            state.ready.push_back(pid);
            state.processes.insert(pid, process);
            Placement::Requeued
        };
        drop(state);

        match placement {
            Placement::Exited => info!(pid, "process exited"),
            Placement::Blocked => debug!(pid, "process blocked"),
            Placement::Requeued => debug!(pid, "process requeued"),
        }
        placement
    }

    /// Mark the running process for blocked placement at quantum end
    pub fn running_to_blocked(&self) -> bool {
        let mut state = self.inner.state.lock();
        match state.running.as_mut() {
            Some(slot) => {
                slot.block_requested = true;
                debug!(pid = slot.info.pid, "block requested");
                true
            }
            None => false,
        }
    }

    /// Wake the blocked process called `name`
    ///
    /// Lowest pid wins when several blocked processes share a name. A wake
    /// aimed at the running process withdraws its pending block request.
    pub fn blocked_to_ready(&self, name: &str) -> bool {
        let mut state = self.inner.state.lock();
        let woken = match state.blocked_by_name(name) {
            Some(pid) => state.wake(pid),
            None => state.withdraw_block(|info| info.name == name),
        };
        drop(state);

        self.after_wake(woken, name);
        woken
    }

    /// Wake a blocked process by pid
    pub fn blocked_to_ready_pid(&self, pid: Pid) -> bool {
        let mut state = self.inner.state.lock();
        let woken = state.wake(pid) || state.withdraw_block(|info| info.pid == pid);
        drop(state);

        self.after_wake(woken, pid);
        woken
    }

    fn after_wake(&self, woken: bool, target: impl std::fmt::Display) {
        if woken {
            self.inner.work.notify_all();
            debug!(target = %target, "process woken");
        } else {
            debug!(target = %target, "wake-up missed: no such blocked process");
        }
    }

    /// Force every process in `source` to `target`
    ///
    /// The running process is never touched. `Running` is treated as
    /// `Ready`. Returns how many processes were transitioned.
    pub fn cancel(&self, source: Queue, target: Status) -> usize {
        let target = match target {
            Status::Running => Status::Ready,
            other => other,
        };

        let mut state = self.inner.state.lock();
        let pids: Vec<Pid> = match source {
            Queue::Ready => state.ready.drain(..).collect(),
            Queue::Blocked => std::mem::take(&mut state.blocked).into_iter().collect(),
        };

        for &pid in &pids {
            match target {
                Status::Done => {
                    state.processes.remove(&pid);
                }
                Status::Blocked => {
                    if let Some(process) = state.processes.get_mut(&pid) {
                        process.status = Status::Blocked;
                    }
                    state.blocked.insert(pid);
                }
                Status::Ready | Status::Running => {
                    if let Some(process) = state.processes.get_mut(&pid) {
                        process.status = Status::Ready;
                    }
                    state.ready.push_back(pid);
                }
            }
        }
        drop(state);

        self.inner.work.notify_all();
        info!(source = ?source, target = %target, count = pids.len(), "queue interrupted");
        pids.len()
    }

    /// Park until the ready queue has work
    ///
    /// Checks and waits under the table lock, so a wake or interrupt can
    /// never slip between the check and the wait.
    pub fn wait_for_work(&self, timeout: Option<Duration>) -> Wakeup {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.inner.state.lock();
        loop {
            if !state.ready.is_empty() {
                return Wakeup::Ready;
            }
            if state.blocked.is_empty() && state.running.is_none() {
                return Wakeup::Drained;
            }
            match deadline {
                Some(deadline) => {
                    if self.inner.work.wait_until(&mut state, deadline).timed_out() {
                        return match (state.ready.is_empty(), state.blocked.len()) {
                            (false, _) => Wakeup::Ready,
                            (true, 0) => Wakeup::Drained,
                            (true, blocked) => Wakeup::TimedOut { blocked },
                        };
                    }
                }
                None => self.inner.work.wait(&mut state),
            }
        }
    }

    /// Number of registered processes, the running one included
    pub fn len(&self) -> usize {
        let state = self.inner.state.lock();
        state.processes.len() + usize::from(state.running.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ready_len(&self) -> usize {
        self.inner.state.lock().ready.len()
    }

    pub fn blocked_len(&self) -> usize {
        self.inner.state.lock().blocked.len()
    }

    /// Ready queue in dispatch order
    pub fn ready_pids(&self) -> Vec<Pid> {
        self.inner.state.lock().ready.iter().copied().collect()
    }

    pub fn blocked_pids(&self) -> Vec<Pid> {
        self.inner.state.lock().blocked.iter().copied().collect()
    }

    /// Pid of the process inside a quantum, if any
    pub fn running(&self) -> Option<Pid> {
        self.inner.state.lock().running.as_ref().map(|slot| slot.info.pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        let state = self.inner.state.lock();
        state.processes.contains_key(&pid)
            || state.running.as_ref().is_some_and(|slot| slot.info.pid == pid)
    }

    /// Lowest pid registered under `name`
    pub fn find(&self, name: &str) -> Option<Pid> {
        self.snapshot()
            .into_iter()
            .find(|info| info.name == name)
            .map(|info| info.pid)
    }

    pub fn info(&self, pid: Pid) -> ProcessResult<ProcessInfo> {
        let state = self.inner.state.lock();
        if let Some(process) = state.processes.get(&pid) {
            return Ok(process.info());
        }
        state
            .running
            .as_ref()
            .filter(|slot| slot.info.pid == pid)
            .map(|slot| slot.info.clone())
            .ok_or(ProcessError::NotFound(pid))
    }

    /// Committed memory of a process that is not currently running
    pub fn memory(&self, pid: Pid) -> ProcessResult<Memory> {
        self.inner
            .state
            .lock()
            .processes
            .get(&pid)
            .map(|process| process.memory().clone())
            .ok_or(ProcessError::NotFound(pid))
    }

    /// Every registered process, ordered by pid
    pub fn snapshot(&self) -> Vec<ProcessInfo> {
        let state = self.inner.state.lock();
        let mut infos: Vec<ProcessInfo> = state.processes.values().map(Process::info).collect();
        if let Some(slot) = state.running.as_ref() {
            infos.push(slot.info.clone());
        }
        drop(state);

        infos.sort_by_key(|info| info.pid);
        infos
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
