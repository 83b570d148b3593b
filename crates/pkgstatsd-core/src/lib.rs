//! Core infrastructure for pkgstatsd: app state, client address
//! extraction, identity anonymization, and the in-memory rate limiter
//! backend.

pub mod app;
pub mod extract;
pub mod identity;
pub mod prelude;
pub mod rate_limit;

pub use crate::app::{App, AppBuilder, AppState};

// vim: ts=4
