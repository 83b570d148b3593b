//! Architecture compatibility matrix
//!
//! Static domain data: which OS architectures a system architecture may
//! legitimately report, and the inverse. A pair is accepted only if both
//! directions agree, so a typo in one table cannot silently widen the
//! accepted set. 32-bit OS architectures may be reported by newer
//! 64-bit-capable system architectures, never the other way around.

use std::collections::HashMap;
use std::sync::LazyLock;

use pkgstatsd_types::prelude::*;

static SYSTEM_TO_OS: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
	LazyLock::new(|| {
		HashMap::from([
			("x86_64", &["x86_64", "i686", "i586"] as &[_]),
			("x86_64_v2", &["x86_64", "i686", "i586"]),
			("x86_64_v3", &["x86_64", "i686", "i586"]),
			("x86_64_v4", &["x86_64", "i686", "i586"]),
			("i686", &["i686", "i586"]),
			("i586", &["i586"]),
			("aarch64", &["aarch64", "armv7h", "armv6h", "armv7l", "armv6l", "arm", "armv5tel"]),
			("armv7", &["armv7h", "armv6h", "armv7l", "armv6l", "arm", "armv5tel"]),
			("armv6", &["armv6h", "armv6l", "arm", "armv5tel"]),
			("armv5", &["arm", "armv5tel"]),
			("riscv64", &["riscv64"]),
			("loong64", &["loongarch64"]),
		])
	});

static OS_TO_SYSTEM: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
	LazyLock::new(|| {
		HashMap::from([
			("x86_64", &["x86_64", "x86_64_v2", "x86_64_v3", "x86_64_v4"] as &[_]),
			("i686", &["i686", "x86_64", "x86_64_v2", "x86_64_v3", "x86_64_v4"]),
			("i586", &["i586", "i686", "x86_64", "x86_64_v2", "x86_64_v3", "x86_64_v4"]),
			("aarch64", &["aarch64"]),
			("armv7h", &["armv7", "aarch64"]),
			("armv7l", &["armv7", "aarch64"]),
			("armv6h", &["armv6", "armv7", "aarch64"]),
			("armv6l", &["armv6", "armv7", "aarch64"]),
			("arm", &["armv5", "armv6", "armv7", "aarch64"]),
			("armv5tel", &["armv5", "armv6", "armv7", "aarch64"]),
			("riscv64", &["riscv64"]),
			("loongarch64", &["loong64"]),
		])
	});

/// Checks that the reported system/OS architecture pair is a known-valid
/// combination in both lookup directions.
pub fn validate_architectures(system_arch: &str, os_arch: &str) -> PkgResult<()> {
	let Some(valid_os) = SYSTEM_TO_OS.get(system_arch) else {
		return Err(Error::ValidationError(
			format!("invalid system architecture: {}", system_arch).into(),
		));
	};

	if !valid_os.contains(&os_arch) {
		return Err(Error::ValidationError(
			format!(
				"invalid OS architecture {} for system architecture {}",
				os_arch, system_arch
			)
			.into(),
		));
	}

	let valid_system = OS_TO_SYSTEM.get(os_arch).copied().unwrap_or_default();
	if !valid_system.contains(&system_arch) {
		return Err(Error::ValidationError(
			format!(
				"invalid system architecture {} for OS architecture {}",
				system_arch, os_arch
			)
			.into(),
		));
	}

	Ok(())
}


// vim: ts=4
