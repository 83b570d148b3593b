//! Stats adapter trait and the validated submission type.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;

use crate::prelude::*;

/// A validated, normalized submission ready for aggregation.
///
/// Transient by design: constructed from a validated request, consumed by
/// the aggregator, then dropped. It is never written to durable storage in
/// this shape; only the monthly counters derived from it are.
#[derive(Clone, Debug)]
pub struct Submission {
	pub system_architecture: Box<str>,
	pub os_architecture: Box<str>,
	pub os_id: Option<Box<str>>,
	/// Mirror URL that survived normalization, if any
	pub mirror_url: Option<Box<str>>,
	/// ISO country code resolved from GeoIP, if any
	pub country: Option<Box<str>>,
	pub packages: Vec<Box<str>>,
}

impl Submission {
	/// Unique package names, lower-cased. Only set membership matters for
	/// the counters; a package reported twice in differing case still
	/// counts once.
	pub fn unique_packages(&self) -> Vec<Box<str>> {
		let mut seen = HashSet::with_capacity(self.packages.len());
		let mut result = Vec::with_capacity(self.packages.len());
		for pkg in &self.packages {
			let lower = pkg.to_lowercase().into_boxed_str();
			if seen.insert(lower.clone()) {
				result.push(lower);
			}
		}
		result
	}
}

/// Persistence seam for the submission aggregator.
///
/// Implementations must fold a submission into the six monthly counter
/// dimensions inside a single transaction: no partial increments may become
/// visible if any step fails.
#[async_trait]
pub trait StatsAdapter: Debug + Send + Sync {
	/// Upserts all counters for the submission under the current month
	async fn save_submission(&self, submission: &Submission) -> PkgResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn submission(packages: &[&str]) -> Submission {
		Submission {
			system_architecture: "x86_64".into(),
			os_architecture: "x86_64".into(),
			os_id: None,
			mirror_url: None,
			country: None,
			packages: packages.iter().map(|p| (*p).into()).collect(),
		}
	}

	#[test]
	fn unique_packages_dedups_case_insensitively() {
		let sub = submission(&["Pacman", "pacman", "PACMAN", "linux"]);
		assert_eq!(sub.unique_packages(), vec!["pacman".into(), "linux".into()] as Vec<Box<str>>);
	}

	#[test]
	fn unique_packages_keeps_distinct_names() {
		let sub = submission(&["pkgstats", "pacman", "linux"]);
		assert_eq!(sub.unique_packages().len(), 3);
	}
}

// vim: ts=4
