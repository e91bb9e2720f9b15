pub mod analysis;
pub mod bounce;
pub mod command;
pub mod composer;
pub mod generator;
pub mod library;
pub mod primitive;
pub mod schedule;
pub mod selector;

pub use analysis::*;
pub use bounce::*;
pub use command::*;
pub use composer::*;
pub use generator::*;
pub use library::*;
pub use primitive::*;
pub use schedule::*;
pub use selector::*;
pub mod ports;

pub use ports::*;
