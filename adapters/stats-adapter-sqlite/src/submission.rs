//! Transactional submission aggregation
//!
//! All six counter dimensions are written inside one transaction: either
//! every counter for a submission is incremented or none are.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::inspect;
use pkgstatsd_types::prelude::*;
use pkgstatsd_types::stats_adapter::Submission;

pub(crate) async fn save_at(
	db: &SqlitePool,
	submission: &Submission,
	month: Month,
) -> PkgResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).or(Err(Error::DbError))?;

	for pkg in submission.unique_packages() {
		upsert(
			&mut tx,
			"INSERT INTO package (name, month, count) VALUES (?, ?, 1)
			 ON CONFLICT(name, month) DO UPDATE SET count = count + 1",
			&pkg,
			month,
		)
		.await?;
	}

	if let Some(country) = &submission.country {
		upsert(
			&mut tx,
			"INSERT INTO country (code, month, count) VALUES (?, ?, 1)
			 ON CONFLICT(code, month) DO UPDATE SET count = count + 1",
			country,
			month,
		)
		.await?;
	}

	if let Some(mirror_url) = &submission.mirror_url {
		upsert(
			&mut tx,
			"INSERT INTO mirror (url, month, count) VALUES (?, ?, 1)
			 ON CONFLICT(url, month) DO UPDATE SET count = count + 1",
			mirror_url,
			month,
		)
		.await?;
	}

	upsert(
		&mut tx,
		"INSERT INTO system_architecture (name, month, count) VALUES (?, ?, 1)
		 ON CONFLICT(name, month) DO UPDATE SET count = count + 1",
		&submission.system_architecture,
		month,
	)
	.await?;

	upsert(
		&mut tx,
		"INSERT INTO operating_system_architecture (name, month, count) VALUES (?, ?, 1)
		 ON CONFLICT(name, month) DO UPDATE SET count = count + 1",
		&submission.os_architecture,
		month,
	)
	.await?;

	if let Some(os_id) = &submission.os_id {
		upsert(
			&mut tx,
			"INSERT INTO operating_system_id (id, month, count) VALUES (?, ?, 1)
			 ON CONFLICT(id, month) DO UPDATE SET count = count + 1",
			os_id,
			month,
		)
		.await?;
	}

	tx.commit().await.inspect_err(inspect).or(Err(Error::DbError))?;

	Ok(())
}

async fn upsert(
	tx: &mut Transaction<'_, Sqlite>,
	query: &str,
	value: &str,
	month: Month,
) -> PkgResult<()> {
	sqlx::query(query)
		.bind(value)
		.bind(month.0)
		.execute(&mut **tx)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;
	Ok(())
}

// vim: ts=4
