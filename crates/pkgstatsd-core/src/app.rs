//! App state type

use std::sync::Arc;

use crate::prelude::*;
use crate::rate_limit::MemoryRateLimiter;

use pkgstatsd_types::geoip_adapter::{GeoIpAdapter, NoopGeoIp};
use pkgstatsd_types::rate_limit_adapter::RateLimitAdapter;
use pkgstatsd_types::stats_adapter::StatsAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_EXPECTED_PACKAGES: [&str; 2] = ["pkgstats", "pacman"];
const DEFAULT_MAX_MISSING: f64 = 0.35;

pub struct AppState {
	pub opts: AppBuilderOpts,

	pub stats_adapter: Arc<dyn StatsAdapter>,
	pub geoip_adapter: Arc<dyn GeoIpAdapter>,
	pub rate_limiter: Arc<dyn RateLimitAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	/// Package names a genuine client list should contain. Empty disables
	/// the expected-package heuristic.
	pub expected_packages: Box<[Box<str>]>,
	/// Maximum fraction of expected packages that may be missing
	pub max_missing: f64,
}

struct Adapters {
	stats_adapter: Option<Arc<dyn StatsAdapter>>,
	geoip_adapter: Option<Arc<dyn GeoIpAdapter>>,
	rate_limiter: Option<Arc<dyn RateLimitAdapter>>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				expected_packages: DEFAULT_EXPECTED_PACKAGES
					.iter()
					.map(|p| (*p).into())
					.collect(),
				max_missing: DEFAULT_MAX_MISSING,
			},
			adapters: Adapters {
				stats_adapter: None,
				geoip_adapter: None,
				rate_limiter: None,
			},
		}
	}

	// Opts
	pub fn expected_packages(&mut self, packages: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.expected_packages = packages.into_iter().map(|p| p.into()).collect();
		self
	}
	pub fn max_missing(&mut self, max_missing: f64) -> &mut Self { self.opts.max_missing = max_missing; self }

	// Adapters
	pub fn stats_adapter(&mut self, stats_adapter: Arc<dyn StatsAdapter>) -> &mut Self { self.adapters.stats_adapter = Some(stats_adapter); self }
	pub fn geoip_adapter(&mut self, geoip_adapter: Arc<dyn GeoIpAdapter>) -> &mut Self { self.adapters.geoip_adapter = Some(geoip_adapter); self }
	pub fn rate_limiter(&mut self, rate_limiter: Arc<dyn RateLimitAdapter>) -> &mut Self { self.adapters.rate_limiter = Some(rate_limiter); self }

	pub fn build(&mut self) -> PkgResult<App> {
		let stats_adapter = self
			.adapters
			.stats_adapter
			.take()
			.ok_or_else(|| Error::ConfigError("stats adapter is required".into()))?;
		let geoip_adapter =
			self.adapters.geoip_adapter.take().unwrap_or_else(|| Arc::new(NoopGeoIp));
		let rate_limiter = self
			.adapters
			.rate_limiter
			.take()
			.unwrap_or_else(|| Arc::new(MemoryRateLimiter::new()));

		if !(0.0..=1.0).contains(&self.opts.max_missing) {
			return Err(Error::ConfigError("max_missing must be within 0..=1".into()));
		}

		info!(
			version = VERSION,
			expected_packages = ?self.opts.expected_packages,
			"building app state"
		);

		Ok(Arc::new(AppState {
			opts: std::mem::replace(
				&mut self.opts,
				AppBuilderOpts { expected_packages: Box::new([]), max_missing: DEFAULT_MAX_MISSING },
			),
			stats_adapter,
			geoip_adapter,
			rate_limiter,
		}))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
