//! Aggregation tests against a real SQLite database

use tempfile::TempDir;

use pkgstatsd_stats_adapter_sqlite::StatsAdapterSqlite;
use pkgstatsd_types::stats_adapter::{StatsAdapter, Submission};
use pkgstatsd_types::types::Month;

async fn create_test_adapter() -> (StatsAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = StatsAdapterSqlite::new(temp_dir.path().join("stats.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn submission() -> Submission {
	Submission {
		system_architecture: "x86_64".into(),
		os_architecture: "x86_64".into(),
		os_id: Some("arch".into()),
		mirror_url: Some("https://geo.mirror.pkgbuild.com/".into()),
		country: Some("DE".into()),
		packages: vec!["pkgstats".into(), "pacman".into(), "linux".into()],
	}
}

async fn counter(adapter: &StatsAdapterSqlite, query: &str, value: &str) -> Option<i64> {
	sqlx::query_scalar(query)
		.bind(value)
		.fetch_optional(adapter.pool())
		.await
		.expect("query should run")
}

#[tokio::test]
async fn saves_all_dimensions() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.save_submission(&submission()).await.expect("save should succeed");

	for pkg in ["pkgstats", "pacman", "linux"] {
		assert_eq!(
			counter(&adapter, "SELECT count FROM package WHERE name = ?", pkg).await,
			Some(1),
			"package {} should be counted once",
			pkg
		);
	}
	assert_eq!(
		counter(&adapter, "SELECT count FROM country WHERE code = ?", "DE").await,
		Some(1)
	);
	assert_eq!(
		counter(
			&adapter,
			"SELECT count FROM mirror WHERE url = ?",
			"https://geo.mirror.pkgbuild.com/"
		)
		.await,
		Some(1)
	);
	assert_eq!(
		counter(&adapter, "SELECT count FROM system_architecture WHERE name = ?", "x86_64").await,
		Some(1)
	);
	assert_eq!(
		counter(
			&adapter,
			"SELECT count FROM operating_system_architecture WHERE name = ?",
			"x86_64"
		)
		.await,
		Some(1)
	);
	assert_eq!(
		counter(&adapter, "SELECT count FROM operating_system_id WHERE id = ?", "arch").await,
		Some(1)
	);
}

#[tokio::test]
async fn repeated_submissions_increment_counts() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.save_submission(&submission()).await.expect("first save");
	adapter.save_submission(&submission()).await.expect("second save");

	assert_eq!(
		counter(&adapter, "SELECT count FROM package WHERE name = ?", "pacman").await,
		Some(2)
	);

	let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM package WHERE name = 'pacman'")
		.fetch_one(adapter.pool())
		.await
		.expect("query should run");
	assert_eq!(rows, 1, "one row per (name, month), not one per submission");
}

#[tokio::test]
async fn duplicate_package_casings_count_once() {
	let (adapter, _temp) = create_test_adapter().await;
	let mut sub = submission();
	sub.packages = vec!["Pacman".into(), "pacman".into(), "PACMAN".into()];
	adapter.save_submission(&sub).await.expect("save should succeed");

	assert_eq!(
		counter(&adapter, "SELECT count FROM package WHERE name = ?", "pacman").await,
		Some(1),
		"case variants dedup to a single increment"
	);
}

#[tokio::test]
async fn optional_dimensions_are_skipped() {
	let (adapter, _temp) = create_test_adapter().await;
	let sub = Submission {
		os_id: None,
		mirror_url: None,
		country: None,
		..submission()
	};
	adapter.save_submission(&sub).await.expect("save should succeed");

	let mirrors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mirror")
		.fetch_one(adapter.pool())
		.await
		.expect("query should run");
	assert_eq!(mirrors, 0);

	let countries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM country")
		.fetch_one(adapter.pool())
		.await
		.expect("query should run");
	assert_eq!(countries, 0);

	let os_ids: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operating_system_id")
		.fetch_one(adapter.pool())
		.await
		.expect("query should run");
	assert_eq!(os_ids, 0);
}

#[tokio::test]
async fn months_keep_distinct_rows() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.save_submission_at(&submission(), Month(202501)).await.expect("january save");
	adapter.save_submission_at(&submission(), Month(202502)).await.expect("february save");

	let rows: Vec<(u32, i64)> =
		sqlx::query_as("SELECT month, count FROM package WHERE name = 'pacman' ORDER BY month")
			.fetch_all(adapter.pool())
			.await
			.expect("query should run");
	assert_eq!(rows, vec![(202501, 1), (202502, 1)]);
}

// vim: ts=4
