//! Client identity anonymization
//!
//! Derives the rate-limit key from a client address by irreversibly
//! truncating host-identifying bits. The raw address is never stored; the
//! anonymized form is the only identity the limiter ever sees.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Anonymizes a client address into a rate-limit key.
///
/// IPv4: the last octet is zeroed (192.168.1.100 -> 192.168.1.0).
/// IPv6: the last 80 bits are zeroed, keeping the first 48
/// (2a02:fb00::1 -> 2a02:fb00::).
/// `None` yields the empty string; such clients still share one limiter
/// bucket rather than bypassing the limit.
pub fn anonymize_ip(ip: Option<IpAddr>) -> Box<str> {
	match ip {
		None => "".into(),
		Some(IpAddr::V4(ip)) => {
			let mut octets = ip.octets();
			octets[3] = 0;
			Ipv4Addr::from(octets).to_string().into()
		}
		Some(IpAddr::V6(ip)) => {
			let mut octets = ip.octets();
			for octet in octets.iter_mut().skip(6) {
				*octet = 0;
			}
			Ipv6Addr::from(octets).to_string().into()
		}
	}
}


// vim: ts=4
