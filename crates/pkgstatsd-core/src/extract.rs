//! Client address extraction
//!
//! The submit endpoint usually runs behind a reverse proxy, so the
//! forwarding headers take precedence over the socket peer address.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the client address for a request.
///
/// Checks `X-Forwarded-For` first (the first entry is the original
/// client), then `X-Real-IP`, then falls back to the connection's peer
/// address. Unparseable header values are ignored.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
	if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
		let first = xff.split(',').next().unwrap_or("").trim();
		if let Ok(ip) = first.parse::<IpAddr>() {
			return ip;
		}
	}

	if let Some(xri) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
		if let Ok(ip) = xri.trim().parse::<IpAddr>() {
			return ip;
		}
	}

	peer.ip()
}


// vim: ts=4
