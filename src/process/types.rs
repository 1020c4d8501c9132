/*!
 * Process Types
 * Common types for process management
 */

use crate::core::types::{Pid, Priority};
use crate::cpu::Contextual;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have reached Done and been removed from the process table.")
    )]
    NotFound(Pid),
}

/// Process status
///
/// Doubles as the return vocabulary of step functions. `Ready` and
/// `Running` both mean "continue" when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Waiting in the ready queue
    Ready,
    /// Inside a quantum
    Running,
    /// Parked until woken
    Blocked,
    /// Terminated
    Done,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self == Status::Done
    }

    /// Whether a step returning this status asks to be scheduled again
    pub fn is_continue(self) -> bool {
        matches!(self, Status::Ready | Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ready => "ready",
            Status::Running => "running",
            Status::Blocked => "blocked",
            Status::Done => "done",
        };
        f.write_str(s)
    }
}

/// A process's code, invoked once per quantum
pub type StepFn = Arc<dyn Fn(&mut Contextual<'_>) -> Status + Send + Sync>;

/// Where a process landed after its quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Back of the ready queue
    Requeued,
    /// Parked in the blocked set
    Blocked,
    /// Removed from the process table
    Exited,
}

/// Kernel queue targeted by an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Queue {
    Ready,
    Blocked,
}

/// Outcome of waiting for the ready queue to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// At least one process is ready
    Ready,
    /// Nothing is ready, blocked or running
    Drained,
    /// The wait expired with processes still blocked
    TimedOut { blocked: usize },
}

/// Process metadata snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub priority: Priority,
    pub pc: u64,
    pub status: Status,
    pub memory_slots: usize,
}
