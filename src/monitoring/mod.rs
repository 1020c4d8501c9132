/*!
 * Monitoring Module
 * Structured logging for the kernel
 */

pub mod tracer;

pub use tracer::{init_tracing, init_tracing_with, quantum_span, run_span, TraceFormat};
