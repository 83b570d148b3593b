pub use crate::app::{App, AppState};
pub use pkgstatsd_types::error::{Error, PkgResult};
pub use pkgstatsd_types::types::{Month, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
