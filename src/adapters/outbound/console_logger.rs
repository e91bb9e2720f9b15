use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards domain messages to the `tracing` subscriber under the `choreo` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "choreo", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "choreo", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "choreo", "{}", msg);
    }
}

/// Console logger that relies on whatever tracing subscriber the binary installed.
pub fn init_console_logger() -> DynLogger {
    Arc::new(TracingBridge)
}
