use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

struct Silent;

impl DomainLogger for Silent {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Discards everything; the default for unit tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(Silent)
}
