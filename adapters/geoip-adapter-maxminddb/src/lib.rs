//! MaxMind-backed GeoIP adapter
//!
//! Resolves a client address to an ISO country code from a MaxMind
//! country database. Lookup failures are swallowed: country enrichment is
//! best-effort and must never block ingestion.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{Reader, geoip2};
use tracing::debug;

use pkgstatsd_types::error::{Error, PkgResult};
use pkgstatsd_types::geoip_adapter::GeoIpAdapter;

pub struct MaxMindGeoIp {
	reader: Reader<Vec<u8>>,
}

impl MaxMindGeoIp {
	pub fn new(path: impl AsRef<Path>) -> PkgResult<Self> {
		let reader = Reader::open_readfile(path.as_ref()).map_err(|err| {
			Error::ConfigError(
				format!("cannot open GeoIP database {}: {}", path.as_ref().display(), err).into(),
			)
		})?;
		Ok(Self { reader })
	}
}

impl std::fmt::Debug for MaxMindGeoIp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MaxMindGeoIp").finish_non_exhaustive()
	}
}

impl GeoIpAdapter for MaxMindGeoIp {
	fn country_code(&self, ip: IpAddr) -> Option<Box<str>> {
		let country: geoip2::Country = match self.reader.lookup(ip) {
			Ok(Some(record)) => record,
			Ok(None) => return None,
			Err(err) => {
				debug!(ip = %ip, "geoip lookup failed: {}", err);
				return None;
			}
		};
		country.country.and_then(|c| c.iso_code).map(Into::into)
	}
}

// vim: ts=4
