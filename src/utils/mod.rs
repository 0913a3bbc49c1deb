//! Utilities: logging setup (verbosity flags -> `log` level filter).
//!
//! Key items:
//!   init_logging / derive_level
//!
//! Log lines always go to stderr; stdout is reserved for the relayed
//! response body.

/// Logging helpers.
pub mod logging {
    use log::LevelFilter;

    /// Environment variable that overrides the flag-derived filter
    /// (same syntax as `RUST_LOG`).
    pub const LOG_ENV: &str = "SIAAPI_LOG";

    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Install the global logger. Calling twice is harmless (second call is ignored).
    pub fn init_logging(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_env(LOG_ENV)
            .target(env_logger::Target::Stderr)
            .format_timestamp_millis()
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};
