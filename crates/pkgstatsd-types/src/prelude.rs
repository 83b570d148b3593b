pub use crate::error::{Error, PkgResult};
pub use crate::types::{Month, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
