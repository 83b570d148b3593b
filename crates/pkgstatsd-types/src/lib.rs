//! Shared types, adapter traits, and the error type for the pkgstatsd
//! telemetry collector.
//!
//! This crate contains the foundational types that are shared between the
//! server crate, the feature crates, and all adapter implementations.
//! Extracting these into a separate crate allows adapter crates to compile
//! in parallel with the feature modules.

pub mod error;
pub mod geoip_adapter;
pub mod prelude;
pub mod rate_limit_adapter;
pub mod stats_adapter;
pub mod types;

// vim: ts=4
