//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `resolution`: Token, organisation, backend and URL resolution tests
//! - `validation`: Scope flag consistency and settings tests

mod helpers;
mod resolution;
