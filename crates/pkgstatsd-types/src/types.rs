//! Common types used throughout pkgstatsd.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// Timestamp //
//***********//
/// Seconds since the Unix epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(res.as_secs() as i64)
}

// Month //
//*******//
/// Denormalized calendar month encoded as `YYYYMM` (e.g. 202501).
///
/// Kept as a plain integer so the counter tables can index and range-query
/// it without calendar logic at query time. Always derived from wall-clock
/// "now" at submission time, never client-supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(pub u32);

impl Month {
	pub fn current() -> Self {
		let now = chrono::Utc::now();
		Month(now.year() as u32 * 100 + now.month())
	}
}

impl std::fmt::Display for Month {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn current_month_is_yyyymm() {
		let month = Month::current().0;
		let year = month / 100;
		let m = month % 100;
		assert!((2024..2200).contains(&year));
		assert!((1..=12).contains(&m));
	}
}

// vim: ts=4
