//! SQLite-backed stats adapter
//!
//! Owns the counter database: schema initialization, the transactional
//! submission aggregator, and the persistent sliding-window rate limiter
//! backend sharing the same pool.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use pkgstatsd_types::prelude::*;
use pkgstatsd_types::stats_adapter::{StatsAdapter, Submission};

mod rate_limit;
mod schema;
mod submission;

pub use rate_limit::SqliteRateLimiter;

use schema::init_db;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

#[derive(Debug)]
pub struct StatsAdapterSqlite {
	db: SqlitePool,
}

impl StatsAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> PkgResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		Ok(Self { db })
	}

	/// Persistent rate limiter sharing this adapter's pool
	pub fn rate_limiter(&self, limit: u32, interval_secs: i64) -> Arc<SqliteRateLimiter> {
		Arc::new(SqliteRateLimiter::new(self.db.clone(), limit, interval_secs))
	}

	/// Aggregates a submission under an explicit month. Exposed so tests
	/// can exercise month-boundary behavior; the trait method always uses
	/// the current month.
	pub async fn save_submission_at(&self, submission: &Submission, month: Month) -> PkgResult<()> {
		submission::save_at(&self.db, submission, month).await
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.db
	}
}

#[async_trait]
impl StatsAdapter for StatsAdapterSqlite {
	async fn save_submission(&self, submission: &Submission) -> PkgResult<()> {
		// The month is fixed once here; a submission straddling a month
		// boundary mid-transaction cannot split across two months
		submission::save_at(&self.db, submission, Month::current()).await
	}
}

// vim: ts=4
