pub mod agent;
pub mod dispatcher;
pub mod worker;

pub use agent::*;
pub use dispatcher::*;
pub use worker::*;
pub mod ports;

pub use ports::*;
