//! Persistent rate limiter tests

use tempfile::TempDir;

use pkgstatsd_core::rate_limit::MemoryRateLimiter;
use pkgstatsd_stats_adapter_sqlite::StatsAdapterSqlite;
use pkgstatsd_types::rate_limit_adapter::{RateLimitAdapter, RateLimitDecision};
use pkgstatsd_types::types::Timestamp;

async fn create_test_adapter() -> (StatsAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = StatsAdapterSqlite::new(temp_dir.path().join("stats.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

#[tokio::test]
async fn admits_up_to_limit_then_rejects_with_retry_at() {
	let (adapter, _temp) = create_test_adapter().await;
	let limiter = adapter.rate_limiter(3, 100);

	for i in 0..3 {
		let decision = limiter.check_at("203.0.113.0", Timestamp(1_000 + i)).await.expect("check");
		assert_eq!(decision, RateLimitDecision::Allowed, "request {} should pass", i);
	}

	let decision = limiter.check_at("203.0.113.0", Timestamp(1_003)).await.expect("check");
	// retry_at is the oldest in-window timestamp plus the window length
	assert_eq!(decision, RateLimitDecision::Limited { retry_at: Timestamp(1_000 + 100) });
}

#[tokio::test]
async fn window_expiry_readmits() {
	let (adapter, _temp) = create_test_adapter().await;
	let limiter = adapter.rate_limiter(1, 100);

	assert_eq!(
		limiter.check_at("key", Timestamp(1_000)).await.expect("check"),
		RateLimitDecision::Allowed
	);
	assert!(matches!(
		limiter.check_at("key", Timestamp(1_050)).await.expect("check"),
		RateLimitDecision::Limited { .. }
	));
	assert_eq!(
		limiter.check_at("key", Timestamp(1_101)).await.expect("check"),
		RateLimitDecision::Allowed
	);
}

#[tokio::test]
async fn keys_are_independent() {
	let (adapter, _temp) = create_test_adapter().await;
	let limiter = adapter.rate_limiter(1, 100);

	assert_eq!(
		limiter.check_at("a", Timestamp(1_000)).await.expect("check"),
		RateLimitDecision::Allowed
	);
	assert!(matches!(
		limiter.check_at("a", Timestamp(1_001)).await.expect("check"),
		RateLimitDecision::Limited { .. }
	));
	assert_eq!(
		limiter.check_at("b", Timestamp(1_001)).await.expect("check"),
		RateLimitDecision::Allowed
	);
}

/// Both backends must produce identical decisions for identical
/// timestamp sequences.
#[tokio::test]
async fn decisions_match_memory_backend() {
	let (adapter, _temp) = create_test_adapter().await;
	let sqlite = adapter.rate_limiter(2, 50);

	let clock = std::sync::Arc::new(std::sync::atomic::AtomicI64::new(0));
	let clock_time = clock.clone();
	let memory = MemoryRateLimiter::with_clock(
		2,
		50,
		Box::new(move || Timestamp(clock_time.load(std::sync::atomic::Ordering::SeqCst))),
	);

	let sequence = [1_000i64, 1_010, 1_020, 1_060, 1_070, 1_075, 1_200];
	for ts in sequence {
		clock.store(ts, std::sync::atomic::Ordering::SeqCst);
		let sqlite_decision = sqlite.check_at("key", Timestamp(ts)).await.expect("sqlite check");
		let memory_decision = memory.check("key").await.expect("memory check");
		assert_eq!(sqlite_decision, memory_decision, "divergence at t={}", ts);
	}
}

#[tokio::test]
async fn empty_key_is_rate_limited_too() {
	let (adapter, _temp) = create_test_adapter().await;
	let limiter = adapter.rate_limiter(1, 100);

	assert_eq!(
		limiter.check_at("", Timestamp(1_000)).await.expect("check"),
		RateLimitDecision::Allowed
	);
	assert!(matches!(
		limiter.check_at("", Timestamp(1_001)).await.expect("check"),
		RateLimitDecision::Limited { .. }
	));
}

// vim: ts=4
