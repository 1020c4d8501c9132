/*!
 * Scheduler Module
 * Scheduling policies that drive the kernel run loop
 */

pub mod fcfs;
pub mod noop;
pub mod traits;
pub mod types;

// Re-export public API
pub use fcfs::FcfsScheduler;
pub use noop::NoScheduler;
pub use traits::Scheduler;
pub use types::{Policy, SchedulerStats};
