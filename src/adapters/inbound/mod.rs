pub mod analysis_file;

pub use analysis_file::*;
