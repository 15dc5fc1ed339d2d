//! Run orchestration and console reporting.
pub mod progress;
mod runner;
pub(crate) mod summary;

pub use runner::{CheckReport, run_check, run_with_transport};
