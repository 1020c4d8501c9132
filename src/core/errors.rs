/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

// Re-export ProcessError from process module
pub use crate::process::ProcessError;

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Scheduler stalled: {blocked} blocked process(es) and nothing left to wake them")]
    #[diagnostic(
        code(scheduler::stalled),
        help("Every runnable process is blocked. Something must call blocked_to_ready or cancel.")
    )]
    Stalled { blocked: usize },

    #[error("Unknown scheduling policy: {0}")]
    #[diagnostic(
        code(scheduler::unknown_policy),
        help("Use one of: none, fcfs.")
    )]
    UnknownPolicy(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    #[diagnostic(
        code(config::invalid),
        help("Check the SHAM_* environment variables.")
    )]
    Invalid { key: String, value: String },
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum KernelError {
    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
