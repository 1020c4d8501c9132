/*!
 * Structured Tracing
 * Subscriber setup and spans for kernel runs and quanta
 */

use tracing::{info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};
use uuid::Uuid;

use crate::core::types::Pid;

/// Enables JSON output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "SHAM_TRACE_JSON";

/// Filter used when RUST_LOG is unset; quantum spans need `sham_kernel=debug`
const DEFAULT_FILTER: &str = "info";

/// Output shape of the kernel log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Compact,
    Json,
}

impl TraceFormat {
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") | Some("true") => Self::Json,
            _ => Self::Compact,
        }
    }

    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ENV_TRACE_JSON).ok().as_deref())
    }
}

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SHAM_TRACE_JSON: Enable JSON output (default: false)
///
/// Both formats report `kernel_run` and `quantum` spans when they close,
/// so per-quantum timing shows up at debug level.
pub fn init_tracing() -> Result<(), TryInitError> {
    init_tracing_with(TraceFormat::from_env())
}

pub fn init_tracing_with(format: TraceFormat) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        TraceFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?,
        TraceFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?,
    }

    info!(format = ?format, "kernel tracing initialized");
    Ok(())
}

/// Generate a unique id for one kernel run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering a whole scheduler run
pub fn run_span(scheduler: &str) -> Span {
    span!(
        Level::INFO,
        "kernel_run",
        run_id = %generate_run_id(),
        scheduler = scheduler
    )
}

/// Span covering one quantum of one process
pub fn quantum_span(pid: Pid, name: &str, pc: u64) -> Span {
    span!(Level::DEBUG, "quantum", pid = pid, name = name, pc = pc)
}
