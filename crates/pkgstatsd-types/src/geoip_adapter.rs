//! GeoIP adapter trait.
//!
//! Country enrichment is best-effort: a lookup that cannot resolve a
//! country yields `None` and must never fail the submission. The raw IP is
//! consulted once per request and never persisted.

use std::fmt::Debug;
use std::net::IpAddr;

pub trait GeoIpAdapter: Debug + Send + Sync {
	/// Returns the ISO country code for the address, if known
	fn country_code(&self, ip: IpAddr) -> Option<Box<str>>;
}

/// GeoIP implementation that never resolves a country. Used in tests and
/// deployments without a GeoIP database.
#[derive(Debug)]
pub struct NoopGeoIp;

impl GeoIpAdapter for NoopGeoIp {
	fn country_code(&self, _ip: IpAddr) -> Option<Box<str>> {
		None
	}
}

// vim: ts=4
