#![deny(missing_docs)]
//! Shared logging utilities for the ClipWise workspace.
//!
//! This crate provides the `cw_*` logging macros used across the codebase,
//! a minimal test initializer for the global logger, and [`redact_url`] for
//! keeping signed media URLs out of log output.

#[doc(hidden)]
pub use log as __log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! cw_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! cw_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! cw_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! cw_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! cw_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!($($arg)*);
    }};
}

const REDACTED: &str = "<redacted>";

/// Returns a log-safe rendering of `raw`.
///
/// Media URLs handed out by the clip service are pre-signed: the query string
/// carries the credentials. The query, fragment and any userinfo are replaced
/// so the result identifies the object without granting access to it.
/// Input that does not parse as a URL is replaced entirely.
pub fn redact_url(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return REDACTED.to_string();
    };
    let had_secrets = parsed.query().is_some()
        || parsed.fragment().is_some()
        || !parsed.username().is_empty()
        || parsed.password().is_some();
    parsed.set_query(None);
    parsed.set_fragment(None);
    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);
    if had_secrets {
        format!("{parsed}?{REDACTED}")
    } else {
        parsed.to_string()
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
