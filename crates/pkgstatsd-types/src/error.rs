//! Error type shared by all pkgstatsd crates.
//!
//! Errors fall into three categories the client can observe: validation
//! failures (400 with a human-readable detail), rate limiting (429 with a
//! Retry-After header), and internal errors (500, detail withheld).
//! Internal errors are logged with full context at the site where they
//! occur; the response body stays generic.

use axum::{http::StatusCode, http::header, response::IntoResponse};

use crate::types::Timestamp;

pub type PkgResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Request failed a validation rule; the detail names the rule
	ValidationError(Box<str>),
	/// Sliding-window limit reached for the anonymized client identity
	RateLimited { retry_at: Timestamp, retry_after_secs: u32 },
	/// Rate-limiter backend failure; the request fails closed
	RateLimitError,
	NotFound,
	DbError,
	ConfigError(Box<str>),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::ValidationError(detail) => write!(f, "validation error: {}", detail),
			Error::RateLimited { retry_at, .. } => {
				write!(f, "rate limit exceeded, retry at {}", retry_at)
			}
			Error::RateLimitError => write!(f, "rate limiter failure"),
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(detail) => write!(f, "config error: {}", detail),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

/// RFC 7807 problem document, the error wire format of the submit API
fn problem(status: StatusCode, detail: &str) -> axum::response::Response {
	let body = serde_json::json!({
		"type": "https://tools.ietf.org/html/rfc2616#section-10",
		"title": status.canonical_reason().unwrap_or("error"),
		"status": status.as_u16(),
		"detail": detail,
	});
	(
		status,
		[(header::CONTENT_TYPE, "application/problem+json")],
		body.to_string(),
	)
		.into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		match self {
			Error::ValidationError(detail) => problem(StatusCode::BAD_REQUEST, &detail),
			Error::RateLimited { retry_at, retry_after_secs } => {
				// retry_at is rendered RFC 3339, the wire format clients parse
				let retry_at = chrono::DateTime::from_timestamp(retry_at.0, 0)
					.map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
					.unwrap_or_else(|| retry_at.to_string());
				let mut res = problem(
					StatusCode::TOO_MANY_REQUESTS,
					&format!("Rate limit exceeded. Retry at {}.", retry_at),
				);
				if let Ok(value) = header::HeaderValue::from_str(&retry_after_secs.to_string()) {
					res.headers_mut().insert(header::RETRY_AFTER, value);
				}
				res
			}
			Error::NotFound => problem(StatusCode::NOT_FOUND, "not found"),
			_ => problem(StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
		}
	}
}


// vim: ts=4
