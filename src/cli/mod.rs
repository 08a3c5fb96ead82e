//! Command-line operations for the `ghaudit` binary.

pub mod audit;
pub mod logging;
pub mod signals;
