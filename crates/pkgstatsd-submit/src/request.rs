//! Submission request parsing and validation.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::architectures::validate_architectures;
use pkgstatsd_types::prelude::*;
use pkgstatsd_types::stats_adapter::Submission;

const EXPECTED_VERSION: &str = "3";
const MIN_PACKAGES: usize = 1;
const MAX_PACKAGES: usize = 20_000;
const MAX_PACKAGE_LEN: usize = 191;
const TRUNCATE_ERROR_MSG_LIMIT: usize = 20;

static OS_ID_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[0-9a-z._-]{1,50}$").unwrap_or_else(|_| unreachable!()));
static PACKAGE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9@:.+_-]{0,190}$").unwrap_or_else(|_| unreachable!())
});

/// A pkgstats submission request as it appears on the wire.
///
/// All fields default so that a missing field surfaces as a validation
/// failure with a field-specific message rather than a JSON decode error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
	pub version: Box<str>,
	pub system: SystemInfo,
	pub os: OsInfo,
	pub pacman: PacmanInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
	pub architecture: Box<str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OsInfo {
	pub architecture: Box<str>,
	pub id: Box<str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PacmanInfo {
	pub mirror: Box<str>,
	pub packages: Vec<Box<str>>,
}

/// Parses and validates a request body
pub fn parse_request(body: &[u8]) -> PkgResult<SubmitRequest> {
	let req: SubmitRequest = serde_json::from_slice(body)
		.map_err(|err| Error::ValidationError(format!("invalid JSON: {}", err).into()))?;
	req.validate()?;
	Ok(req)
}

impl SubmitRequest {
	/// Checks all validation rules in order, short-circuiting on the first
	/// failure
	pub fn validate(&self) -> PkgResult<()> {
		if self.version.as_ref() != EXPECTED_VERSION {
			return Err(Error::ValidationError("version must be \"3\"".into()));
		}

		if self.system.architecture.is_empty() {
			return Err(Error::ValidationError("system.architecture is required".into()));
		}

		if self.os.architecture.is_empty() {
			return Err(Error::ValidationError("os.architecture is required".into()));
		}

		validate_architectures(&self.system.architecture, &self.os.architecture)?;

		if self.pacman.packages.len() < MIN_PACKAGES {
			return Err(Error::ValidationError(
				"pacman.packages must contain at least 1 package".into(),
			));
		}

		if self.pacman.packages.len() > MAX_PACKAGES {
			return Err(Error::ValidationError(
				format!("pacman.packages must contain at most {} packages", MAX_PACKAGES).into(),
			));
		}

		for pkg in &self.pacman.packages {
			if pkg.is_empty() {
				return Err(Error::ValidationError("package name cannot be empty".into()));
			}
			if pkg.len() > MAX_PACKAGE_LEN {
				return Err(Error::ValidationError(
					format!(
						"package name \"{}\" exceeds maximum length of {}",
						truncate(pkg, TRUNCATE_ERROR_MSG_LIMIT),
						MAX_PACKAGE_LEN
					)
					.into(),
				));
			}
			if !PACKAGE_NAME_REGEX.is_match(pkg) {
				return Err(Error::ValidationError(
					format!("invalid package name \"{}\"", truncate(pkg, TRUNCATE_ERROR_MSG_LIMIT))
						.into(),
				));
			}
		}

		if !self.os.id.is_empty() && !OS_ID_REGEX.is_match(&self.os.id) {
			return Err(Error::ValidationError(
				"os.id must match pattern [0-9a-z._-]{1,50}".into(),
			));
		}

		Ok(())
	}

	/// Consumes the validated request into the aggregation-ready form
	pub fn into_submission(
		self,
		country: Option<Box<str>>,
		mirror_url: Option<Box<str>>,
	) -> Submission {
		Submission {
			system_architecture: self.system.architecture,
			os_architecture: self.os.architecture,
			os_id: if self.os.id.is_empty() { None } else { Some(self.os.id) },
			mirror_url,
			country,
			packages: self.pacman.packages,
		}
	}
}

/// Checks that a sufficient fraction of the expected packages is present
/// in the submitted list (case-insensitively).
///
/// A legitimate client always has the package manager and this tool's own
/// package installed; a list missing most of these is almost certainly
/// forged or corrupted. An empty expected set disables the check.
pub fn validate_expected_packages(
	packages: &[Box<str>],
	expected: &[Box<str>],
	max_missing: f64,
) -> PkgResult<()> {
	if expected.is_empty() {
		return Ok(());
	}

	let pkg_set: HashSet<String> = packages.iter().map(|p| p.to_lowercase()).collect();
	let missing = expected.iter().filter(|e| !pkg_set.contains(&e.to_lowercase())).count();

	if missing as f64 / expected.len() as f64 > max_missing {
		return Err(Error::ValidationError(
			"package list does not contain expected packages".into(),
		));
	}

	Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
	if s.len() <= max_len {
		s.to_string()
	} else {
		let cut = s.char_indices().nth(max_len).map_or(s.len(), |(i, _)| i);
		format!("{}...", &s[..cut])
	}
}


// vim: ts=4
