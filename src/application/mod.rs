pub mod choreography_service;

pub use choreography_service::*;
