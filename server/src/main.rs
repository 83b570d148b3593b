//! pkgstatsd server binary
//!
//! Wires the adapters together from environment configuration and serves
//! the submission endpoint.

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use tracing_subscriber::EnvFilter;

use pkgstatsd_core::AppBuilder;
use pkgstatsd_core::rate_limit::MemoryRateLimiter;
use pkgstatsd_geoip_adapter_maxminddb::MaxMindGeoIp;
use pkgstatsd_stats_adapter_sqlite::StatsAdapterSqlite;
use pkgstatsd_types::prelude::*;
use pkgstatsd_types::rate_limit_adapter::{
	DEFAULT_RATE_INTERVAL_SECS, DEFAULT_RATE_LIMIT, NoopRateLimiter, RateLimitAdapter,
};

struct Config {
	listen: Box<str>,
	db_path: PathBuf,
	geoip_db: Option<PathBuf>,
	/// Rate limiter backend: "sqlite" (default), "memory", or "none"
	rate_limiter: Box<str>,
	rate_limit: u32,
	rate_interval_secs: i64,
	expected_packages: Vec<Box<str>>,
	max_missing: f64,
}

impl Config {
	fn from_env() -> Self {
		Config {
			listen: env::var("PKGSTATSD_LISTEN").unwrap_or("127.0.0.1:8080".to_string()).into(),
			db_path: PathBuf::from(
				env::var("PKGSTATSD_DB").unwrap_or("./data/pkgstats.db".to_string()),
			),
			geoip_db: env::var("PKGSTATSD_GEOIP_DB").ok().map(PathBuf::from),
			rate_limiter: env::var("PKGSTATSD_RATE_LIMITER")
				.unwrap_or("sqlite".to_string())
				.into(),
			rate_limit: env::var("PKGSTATSD_RATE_LIMIT")
				.ok()
				.and_then(|v| v.parse().ok())
				.unwrap_or(DEFAULT_RATE_LIMIT),
			rate_interval_secs: env::var("PKGSTATSD_RATE_INTERVAL_SECS")
				.ok()
				.and_then(|v| v.parse().ok())
				.unwrap_or(DEFAULT_RATE_INTERVAL_SECS),
			expected_packages: match env::var("PKGSTATSD_EXPECTED_PACKAGES") {
				// an explicitly empty list disables the heuristic
				Ok(list) => list
					.split(',')
					.map(str::trim)
					.filter(|p| !p.is_empty())
					.map(Into::into)
					.collect(),
				Err(_) => vec!["pkgstats".into(), "pacman".into()],
			},
			max_missing: env::var("PKGSTATSD_MAX_MISSING")
				.ok()
				.and_then(|v| v.parse().ok())
				.unwrap_or(0.35),
		}
	}
}

#[tokio::main]
async fn main() -> PkgResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = Config::from_env();

	if let Some(parent) = config.db_path.parent() {
		if !parent.as_os_str().is_empty() {
			tokio::fs::create_dir_all(parent).await?;
		}
	}

	let stats_adapter = Arc::new(StatsAdapterSqlite::new(&config.db_path).await?);

	let rate_limiter: Arc<dyn RateLimitAdapter> = match config.rate_limiter.as_ref() {
		"memory" => {
			Arc::new(MemoryRateLimiter::with_limits(config.rate_limit, config.rate_interval_secs))
		}
		"none" => {
			warn!("rate limiting is disabled");
			Arc::new(NoopRateLimiter)
		}
		"sqlite" => stats_adapter.rate_limiter(config.rate_limit, config.rate_interval_secs),
		other => {
			return Err(Error::ConfigError(
				format!("unknown rate limiter backend: {}", other).into(),
			));
		}
	};

	let mut builder = AppBuilder::new();
	builder
		.expected_packages(config.expected_packages)
		.max_missing(config.max_missing)
		.stats_adapter(stats_adapter)
		.rate_limiter(rate_limiter);
	if let Some(geoip_db) = &config.geoip_db {
		builder.geoip_adapter(Arc::new(MaxMindGeoIp::new(geoip_db)?));
	} else {
		info!("no GeoIP database configured, country resolution disabled");
	}
	let app = builder.build()?;

	let router = pkgstatsd_submit::routes(app);
	let listener = tokio::net::TcpListener::bind(config.listen.as_ref()).await?;
	info!(listen = %config.listen, "pkgstatsd listening");

	axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
	info!("shutting down");
}

// vim: ts=4
