//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, IdGenerator)
//! but are themselves concrete structs, not traits.

mod chart;
mod share;

pub use chart::{ApplyOutcome, ChartService};
pub use share::{ShareService, SharedSnapshot, SHARE_ID_PREFIX};
