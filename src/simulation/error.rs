//! Error type shared by asset loading and settings handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing a simulation run.
///
/// Nothing inside a running episode can fail; these only surface at startup.
#[derive(Debug, Error)]
pub enum SimError {
    /// A file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid JSON for [`super::params::Params`].
    #[error("invalid settings file {path}: {source}")]
    Json {
        /// Settings file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// An image asset could not be decoded.
    #[error("failed to decode image {path}: {reason}")]
    Image {
        /// Image file path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
    /// A parameter value makes the simulation impossible to run.
    #[error("invalid parameter: {0}")]
    InvalidParams(&'static str),
}
