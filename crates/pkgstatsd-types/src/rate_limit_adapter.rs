//! Rate limiter adapter trait.
//!
//! Abuse control for the anonymous submit endpoint: a sliding window of
//! accepted-request timestamps per anonymized client identity. Backends
//! (in-memory, sqlite, always-allow) are interchangeable and must produce
//! identical accept/reject decisions for identical timestamp sequences.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// Default limit: 50 requests per 7-day window
pub const DEFAULT_RATE_LIMIT: u32 = 50;
pub const DEFAULT_RATE_INTERVAL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	Allowed,
	/// Limit reached; the window frees a slot once the oldest timestamp in
	/// it ages out, at `retry_at = oldest + window`
	Limited { retry_at: Timestamp },
}

#[async_trait]
pub trait RateLimitAdapter: Debug + Send + Sync {
	/// Checks the window for `key` and, if the request is admitted,
	/// records it. An empty key is a valid key: clients without a usable
	/// address share one bucket rather than bypassing the limiter.
	async fn check(&self, key: &str) -> PkgResult<RateLimitDecision>;
}

/// Rate limiter that always admits. Used to disable limiting in tests.
#[derive(Debug)]
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimitAdapter for NoopRateLimiter {
	async fn check(&self, _key: &str) -> PkgResult<RateLimitDecision> {
		Ok(RateLimitDecision::Allowed)
	}
}

// vim: ts=4
