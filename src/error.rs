//! Error kinds surfaced by a single `siaapi` invocation and their exit codes.
//!
//! Every variant is fatal: the message is printed to stderr and the process
//! exits with `CliError::exit_code()`.

use thiserror::Error;

/// Exit status for endpoint resolution failures (unknown or ambiguous path).
pub const EXIT_RESOLVE: i32 = 127;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Why a path could not be turned into exactly one endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "No matching endpoints for '{path}'. Try specifying the request method or checking http://sia.tech/docs"
    )]
    NotFound { path: String },

    #[error(
        "More than one matching endpoint for '{path}' ({candidates}). Try specifying the request method or checking http://sia.tech/docs"
    )]
    Ambiguous { path: String, candidates: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unable to load API password: {0}")]
    Credentials(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("unable to build request: {0}")]
    Build(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request failed while reading response body: {0}")]
    BodyRead(String),

    #[error("unable to write response body: {0}")]
    Output(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Resolve(_) => EXIT_RESOLVE,
            _ => EXIT_FAILURE,
        }
    }
}
