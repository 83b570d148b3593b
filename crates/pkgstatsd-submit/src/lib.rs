//! Submission ingestion pipeline.
//!
//! The one public write endpoint of pkgstatsd: anonymous clients POST a
//! snapshot of their installed packages, architecture, and mirror, and the
//! pipeline folds it into monthly counters. The endpoint is unauthenticated
//! by design, so everything here is about protecting invariants: abuse
//! control, privacy-preserving identities, strict validation, and atomic
//! aggregation.

pub mod architectures;
pub mod handler;
pub mod mirror;
pub mod request;

pub use handler::routes;

// vim: ts=4
