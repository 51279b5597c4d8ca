//! Shared library for `CreditChecker`
//! Contains the curriculum model, credit aggregation engine, configuration and
//! logging used by the `creditchecker` CLI

pub mod config;
pub mod core;
pub mod logger;

/// Returns the current version of the `CreditChecker` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
