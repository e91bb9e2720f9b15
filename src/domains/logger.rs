use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Run-level logging port injected into the choreography service and agent workers.
/// Infallible from the caller's perspective.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Writes through the `log` facade into a `fast_log` file appender.
pub struct FastLogSink {
    level: log::LevelFilter,
}

impl FastLogSink {
    /// Installs `fast_log` as the process-wide `log` backend writing to `path`.
    /// Only the first installation in a process succeeds.
    pub fn install(path: &str, level: log::LevelFilter) -> Result<Self, Box<dyn std::error::Error>> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))?;
        Ok(Self { level })
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    fn stamp(msg: &str) -> String {
        format!("{} {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true), msg)
    }
}

impl DomainLogger for FastLogSink {
    fn info(&self, msg: &str) {
        log::info!("{}", Self::stamp(msg));
    }

    fn warn(&self, msg: &str) {
        log::warn!("{}", Self::stamp(msg));
    }

    fn error(&self, msg: &str) {
        log::error!("{}", Self::stamp(msg));
    }
}

/// Prefixes every message, e.g. with a run id, before forwarding.
pub struct ScopedLogger {
    inner: DynLogger,
    scope: String,
}

impl ScopedLogger {
    pub fn new(inner: DynLogger, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    pub fn into_dyn(self) -> DynLogger {
        Arc::new(self)
    }
}

impl DomainLogger for ScopedLogger {
    fn info(&self, msg: &str) {
        self.inner.info(&format!("[{}] {}", self.scope, msg));
    }

    fn warn(&self, msg: &str) {
        self.inner.warn(&format!("[{}] {}", self.scope, msg));
    }

    fn error(&self, msg: &str) {
        self.inner.error(&format!("[{}] {}", self.scope, msg));
    }
}
