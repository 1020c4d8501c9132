/*!
 * Memory Module
 * Slot-addressed memory owned by processes and the kernel
 */

pub mod types;

pub use types::{Content, Memory, MemoryError, MemoryResult, Slot};
