use crate::domains::logger::{DynLogger, FastLogSink};
use std::sync::Arc;

/// Installs the fast_log file sink and returns it as an injectable logger.
pub fn init_file_logger(path: &str) -> Result<DynLogger, String> {
    let sink = FastLogSink::install(path, log::LevelFilter::Info)
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(sink))
}
