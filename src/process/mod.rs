/*!
 * Process Module
 * Process control blocks, lifecycle states, and the process table
 */

pub mod pcb;
pub mod table;
pub mod types;

// Re-export for convenience
pub use pcb::Process;
pub use table::ProcessTable;
pub use types::{
    Placement, ProcessError, ProcessInfo, ProcessResult, Queue, Status, StepFn, Wakeup,
};
