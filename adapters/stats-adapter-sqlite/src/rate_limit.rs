//! Persistent sliding-window rate limiter
//!
//! Timestamps are stored as (key, timestamp) rows; window membership is a
//! range condition. The count-then-insert sequence is not serialized
//! against concurrent requests from the same key, which can admit at most
//! one extra acceptance per concurrent in-flight request. That bounded
//! slippage is accepted; see the in-memory backend for exact enforcement
//! in single-process deployments.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::inspect;
use pkgstatsd_types::prelude::*;
use pkgstatsd_types::rate_limit_adapter::{RateLimitAdapter, RateLimitDecision};
use pkgstatsd_types::types::now;

#[derive(Debug)]
pub struct SqliteRateLimiter {
	db: SqlitePool,
	limit: i64,
	interval: i64,
}

impl SqliteRateLimiter {
	pub fn new(db: SqlitePool, limit: u32, interval_secs: i64) -> Self {
		SqliteRateLimiter { db, limit: i64::from(limit), interval: interval_secs }
	}

	/// Window check against an explicit "now", for deterministic tests
	pub async fn check_at(&self, key: &str, now: Timestamp) -> PkgResult<RateLimitDecision> {
		let window_start = now.0 - self.interval;

		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM rate_limit WHERE key = ? AND timestamp > ?",
		)
		.bind(key)
		.bind(window_start)
		.fetch_one(&self.db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

		if count >= self.limit {
			let oldest: Option<i64> = sqlx::query_scalar(
				"SELECT MIN(timestamp) FROM rate_limit WHERE key = ? AND timestamp > ?",
			)
			.bind(key)
			.bind(window_start)
			.fetch_one(&self.db)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

			let oldest = oldest.unwrap_or(now.0);
			return Ok(RateLimitDecision::Limited {
				retry_at: Timestamp(oldest + self.interval),
			});
		}

		sqlx::query("INSERT INTO rate_limit (key, timestamp) VALUES (?, ?)")
			.bind(key)
			.bind(now.0)
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		// Expired rows are cleaned up off the request path; a failed
		// delete is not an error, the rows just wait for the next accept
		let db = self.db.clone();
		tokio::spawn(async move {
			if let Err(err) = sqlx::query("DELETE FROM rate_limit WHERE timestamp < ?")
				.bind(window_start)
				.execute(&db)
				.await
			{
				debug!("rate limit cleanup failed: {:#?}", err);
			}
		});

		Ok(RateLimitDecision::Allowed)
	}
}

#[async_trait]
impl RateLimitAdapter for SqliteRateLimiter {
	async fn check(&self, key: &str) -> PkgResult<RateLimitDecision> {
		self.check_at(key, now()).await
	}
}

// vim: ts=4
