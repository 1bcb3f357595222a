// Errors that abort a probe
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use thiserror::Error;

/// Conditions that stop a probe, download or listing.
///
/// Expected classifications such as a missing or forbidden bucket are
/// returned as a `ProbeOutcome` instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The endpoint answered with a status we don't know how to classify.
    #[error("unhandled status code {status} for bucket '{bucket}' in '{region}'")]
    UnhandledStatus {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Bucket that was probed.
        bucket: String,
        /// Region the bucket was probed in.
        region: String,
    },

    /// A redirect arrived without telling us where the bucket lives.
    #[error("redirect for bucket '{bucket}' did not include a region")]
    MissingRegionHeader {
        /// Bucket that was probed.
        bucket: String,
    },

    /// The HEAD request failed for a reason other than connecting.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A download or listing was attempted on a bucket that isn't open.
    #[error("bucket '{bucket}' is not open")]
    NotOpen {
        /// Bucket that was requested.
        bucket: String,
    },

    /// The credential check failed for a reason other than missing
    /// credentials.
    #[error("credential check failed: {0}")]
    CredentialCheck(String),

    /// Local filesystem errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else raised by a backend.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
