//! In-memory sliding-window rate limiter
//!
//! Holds a key -> timestamps map under a single mutex. The critical
//! section is bounded by the per-key list length, itself bounded by the
//! limit, so the lock stays short even under concurrent load. Suitable for
//! single-process deployments and tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::prelude::*;

use pkgstatsd_types::rate_limit_adapter::{
	DEFAULT_RATE_INTERVAL_SECS, DEFAULT_RATE_LIMIT, RateLimitAdapter, RateLimitDecision,
};
use pkgstatsd_types::types::now;

type Clock = Box<dyn Fn() -> Timestamp + Send + Sync>;

pub struct MemoryRateLimiter {
	requests: Mutex<HashMap<Box<str>, Vec<Timestamp>>>,
	limit: usize,
	interval: i64,
	clock: Clock,
}

impl MemoryRateLimiter {
	pub fn new() -> Self {
		Self::with_limits(DEFAULT_RATE_LIMIT, DEFAULT_RATE_INTERVAL_SECS)
	}

	pub fn with_limits(limit: u32, interval_secs: i64) -> Self {
		Self::with_clock(limit, interval_secs, Box::new(now))
	}

	/// Constructor with an injected clock, for deterministic tests
	pub fn with_clock(limit: u32, interval_secs: i64, clock: Clock) -> Self {
		MemoryRateLimiter {
			requests: Mutex::new(HashMap::new()),
			limit: limit as usize,
			interval: interval_secs,
			clock,
		}
	}
}

impl Default for MemoryRateLimiter {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for MemoryRateLimiter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryRateLimiter")
			.field("limit", &self.limit)
			.field("interval", &self.interval)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl RateLimitAdapter for MemoryRateLimiter {
	async fn check(&self, key: &str) -> PkgResult<RateLimitDecision> {
		let now = (self.clock)();
		let window_start = Timestamp(now.0 - self.interval);

		let mut requests = self.requests.lock();
		let entry = requests.entry(key.into()).or_default();
		entry.retain(|ts| *ts > window_start);

		if entry.len() >= self.limit {
			let oldest = entry.iter().min().copied().unwrap_or(now);
			let count = entry.len();
			if count == 0 {
				// limit 0: a rejected key must not retain an empty bucket
				requests.remove(key);
			}
			debug!(key, count, "rate limit reached");
			return Ok(RateLimitDecision::Limited {
				retry_at: Timestamp(oldest.0 + self.interval),
			});
		}

		entry.push(now);
		Ok(RateLimitDecision::Allowed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicI64, Ordering};

	fn limiter_with_ticking_clock(limit: u32, interval: i64) -> (MemoryRateLimiter, Arc<AtomicI64>) {
		let time = Arc::new(AtomicI64::new(1_000));
		let clock_time = time.clone();
		let limiter = MemoryRateLimiter::with_clock(
			limit,
			interval,
			Box::new(move || Timestamp(clock_time.load(Ordering::SeqCst))),
		);
		(limiter, time)
	}

	#[tokio::test]
	async fn admits_up_to_limit_then_rejects() {
		let (limiter, time) = limiter_with_ticking_clock(50, 604_800);
		let first_accept = Timestamp(time.load(Ordering::SeqCst));

		for i in 0..50 {
			time.fetch_add(1, Ordering::SeqCst);
			let decision = limiter.check("203.0.113.0").await.unwrap();
			assert_eq!(decision, RateLimitDecision::Allowed, "request {} should pass", i);
		}

		let decision = limiter.check("203.0.113.0").await.unwrap();
		// retry_at is the first accepted timestamp plus the window length
		assert_eq!(
			decision,
			RateLimitDecision::Limited { retry_at: Timestamp(first_accept.0 + 1 + 604_800) }
		);
	}

	#[tokio::test]
	async fn keys_are_independent() {
		let (limiter, _) = limiter_with_ticking_clock(1, 100);
		assert_eq!(limiter.check("a").await.unwrap(), RateLimitDecision::Allowed);
		assert!(matches!(
			limiter.check("a").await.unwrap(),
			RateLimitDecision::Limited { .. }
		));
		assert_eq!(limiter.check("b").await.unwrap(), RateLimitDecision::Allowed);
	}

	#[tokio::test]
	async fn window_expiry_readmits() {
		let (limiter, time) = limiter_with_ticking_clock(1, 100);
		assert_eq!(limiter.check("key").await.unwrap(), RateLimitDecision::Allowed);
		assert!(matches!(
			limiter.check("key").await.unwrap(),
			RateLimitDecision::Limited { .. }
		));

		time.fetch_add(101, Ordering::SeqCst);
		assert_eq!(limiter.check("key").await.unwrap(), RateLimitDecision::Allowed);
	}

	#[tokio::test]
	async fn zero_limit_rejects_without_retaining_buckets() {
		let (limiter, _) = limiter_with_ticking_clock(0, 100);
		assert!(matches!(
			limiter.check("203.0.113.0").await.unwrap(),
			RateLimitDecision::Limited { .. }
		));
		assert!(limiter.requests.lock().is_empty(), "rejected keys must not accumulate");
	}

	#[tokio::test]
	async fn empty_key_is_its_own_bucket() {
		let (limiter, _) = limiter_with_ticking_clock(1, 100);
		assert_eq!(limiter.check("").await.unwrap(), RateLimitDecision::Allowed);
		assert!(matches!(limiter.check("").await.unwrap(), RateLimitDecision::Limited { .. }));
	}
}

// vim: ts=4
