/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (informational under FCFS, higher is more important)
pub type Priority = u8;

/// Index of a slot inside a process memory
pub type SlotIndex = usize;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;
