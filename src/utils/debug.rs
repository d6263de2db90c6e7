//! Debug logging helpers gated by `DebugOptions`

use crate::types::DebugOptions;

const TARGET: &str = "placesearch";

/// Log a message if debugging is enabled
pub fn log(options: &Option<DebugOptions>, message: &str, data: &str) {
    if let Some(debug_opts) = options {
        if debug_opts.enabled {
            log::debug!(target: TARGET, "{message}: {data}");
        }
    }
}

/// Log request details if request logging is enabled
pub fn log_request(options: &Option<DebugOptions>, message: &str, data: &str) {
    if let Some(debug_opts) = options {
        if debug_opts.enabled && debug_opts.log_requests {
            log::debug!(target: TARGET, "REQUEST: {message}: {data}");
        }
    }
}

/// Log response details if response logging is enabled
pub fn log_response(options: &Option<DebugOptions>, message: &str) {
    if let Some(debug_opts) = options {
        if debug_opts.enabled && debug_opts.log_responses {
            log::debug!(target: TARGET, "RESPONSE: {message}");
        }
    }
}

/// Create default debug options with all logging enabled
pub fn debug_all() -> DebugOptions {
    DebugOptions {
        enabled: true,
        log_requests: true,
        log_responses: true,
    }
}

/// Create debug options that log requests but not responses
pub fn debug_basic() -> DebugOptions {
    DebugOptions {
        enabled: true,
        log_requests: true,
        log_responses: false,
    }
}
