//! Submit endpoint orchestration
//!
//! Request flow: rate limit check (anonymized identity) -> parse and
//! validate body -> expected-package check -> GeoIP lookup (raw IP,
//! discarded after use) -> mirror normalization -> aggregation.
//! The client only ever learns success or failure, never its own counts.

use axum::{
	Router,
	body::Bytes,
	extract::{ConnectInfo, DefaultBodyLimit, State},
	http::{HeaderMap, StatusCode},
	routing::{get, post},
};
use std::net::SocketAddr;

use crate::{mirror, request};
use pkgstatsd_core::extract::client_ip;
use pkgstatsd_core::identity::anonymize_ip;
use pkgstatsd_core::prelude::*;
use pkgstatsd_types::rate_limit_adapter::RateLimitDecision;
use pkgstatsd_types::types::now;

/// Handles `POST /api/submit`
pub async fn post_submit(
	State(app): State<App>,
	ConnectInfo(peer): ConnectInfo<SocketAddr>,
	headers: HeaderMap,
	body: Bytes,
) -> PkgResult<StatusCode> {
	let ip = client_ip(&headers, peer);

	// The limiter only ever sees the anonymized identity. A backend
	// failure fails closed: a broken limiter must not open the endpoint.
	let key = anonymize_ip(Some(ip));
	match app.rate_limiter.check(&key).await {
		Ok(RateLimitDecision::Allowed) => {}
		Ok(RateLimitDecision::Limited { retry_at }) => {
			let retry_after_secs = (retry_at.0 - now().0).max(1) as u32;
			debug!(key = %key, retry_at = %retry_at, "submission rate limited");
			return Err(Error::RateLimited { retry_at, retry_after_secs });
		}
		Err(err) => {
			error!(error = %err, "rate limit check failed");
			return Err(Error::RateLimitError);
		}
	}

	let req = request::parse_request(&body)?;
	request::validate_expected_packages(
		&req.pacman.packages,
		&app.opts.expected_packages,
		app.opts.max_missing,
	)?;

	// Best effort; the raw IP is not referenced beyond this point
	let country = app.geoip_adapter.country_code(ip);

	let mirror_url = mirror::filter_mirror_url(&req.pacman.mirror);

	let submission = req.into_submission(country, mirror_url);
	app.stats_adapter
		.save_submission(&submission)
		.await
		.inspect_err(|err| error!(error = %err, "failed to save submission"))?;

	Ok(StatusCode::NO_CONTENT)
}

async fn get_health() -> StatusCode {
	StatusCode::OK
}

/// Body cap for the submit route. Must stay above the largest payload the
/// validator can accept: 20000 package names of 191 bytes plus JSON
/// syntax, just under 4 MiB.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn routes(app: App) -> Router {
	Router::new()
		.route(
			"/api/submit",
			post(post_submit).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
		)
		.route("/health", get(get_health))
		.with_state(app)
}

// vim: ts=4
