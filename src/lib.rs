pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod report;

pub use crate::core::{Assumptions, ProjectionResult, RawAssumptions, YearRow};
pub use error::RentOwnError;
