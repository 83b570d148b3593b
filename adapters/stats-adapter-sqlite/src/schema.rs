//! Database schema initialization
//!
//! One counter table per dimension, each keyed by (value, month) with
//! month stored as a denormalized YYYYMM integer. The rate_limit table
//! has no uniqueness constraint; rows are append-only within the window.

use sqlx::SqlitePool;

pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Counters
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS package (
		name text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(name, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS country (
		code text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(code, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS mirror (
		url text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(url, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS system_architecture (
		name text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(name, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS operating_system_architecture (
		name text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(name, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS operating_system_id (
		id text NOT NULL,
		month integer NOT NULL,
		count integer NOT NULL DEFAULT 1,
		PRIMARY KEY(id, month)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Rate limiting
	//***************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS rate_limit (
		key text NOT NULL,
		timestamp integer NOT NULL
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_rate_limit_key_ts ON rate_limit(key, timestamp)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
