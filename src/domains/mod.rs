pub mod choreography;
pub mod fleet;
pub mod logger;

pub use choreography::*;
pub use fleet::*;
pub use logger::*;
