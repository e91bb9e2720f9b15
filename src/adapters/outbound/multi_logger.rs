use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans each message out to every attached logger, in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Console logging, plus a file sink when `file` is set and fast_log can be installed.
pub fn init_combined_logger(file: Option<&str>) -> DynLogger {
    let console = super::init_console_logger();
    let Some(path) = file else {
        return console;
    };
    match super::init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![console, file_logger])),
        Err(e) => {
            console.warn(&format!("{}; continuing with console logging only", e));
            console
        }
    }
}
