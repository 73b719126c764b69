//! Data models for Simple DVD Creator.
//!
//! - [`Job`]: one conversion request, immutable once built
//! - [`OpticalDrive`]: a discovered burn target

mod drive;
mod job;

pub use drive::OpticalDrive;
pub use job::{Job, JobBuilder};
