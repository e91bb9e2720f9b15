pub mod buffered_logger;
pub mod console_logger;
pub mod file_logger;
pub mod log_actuator;
pub mod multi_logger;
pub mod noop_logger;
pub mod readiness;
pub mod recording_actuator;

pub use buffered_logger::*;
pub use console_logger::*;
pub use file_logger::*;
pub use log_actuator::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use readiness::*;
pub use recording_actuator::*;
