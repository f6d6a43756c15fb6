//! Local filesystem access and the wiring of chart and share services

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
