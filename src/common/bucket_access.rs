// BucketAccess trait
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use super::{
    Bucket,
    ProbeError,
};

/// Result of trying to list a bucket with credentials after an anonymous
/// probe was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ListingAttempt {
    /// The bucket was listed.
    Listed,

    /// The listing completed but its output reported an error.
    ErrorMarker,

    /// S3 explicitly denied the listing.
    Denied,

    /// The listing failed for a reason we can't classify. This may be a
    /// transient or network error rather than a denial.
    Failed {
        /// What went wrong, for logging.
        reason: String,
    },
}

/// `BucketAccess` represents the operations on a bucket that go beyond the
/// anonymous HEAD probe.
///
/// This trait should be implemented by all `Client`s performing these tasks.
#[async_trait]
pub trait BucketAccess: Send + Sync {
    /// Returns `true` if usable credentials are configured.
    ///
    /// Only the specific "credentials are missing" signal yields `false`,
    /// every other failure is a `ProbeError::CredentialCheck`.
    async fn has_credentials(&self) -> Result<bool, ProbeError>;

    /// Attempts a signed listing of `bucket`.
    async fn authenticated_listing(&self, bucket: &Bucket) -> ListingAttempt;

    /// Returns the human readable total size of `bucket`.
    ///
    /// Requests are unsigned when `authenticated` is `false`. This assumes
    /// the bucket is accessible.
    async fn bucket_size(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String>;

    /// Copies every object in `bucket` into `destination` using unsigned
    /// requests.
    async fn sync_bucket(&self, bucket: &Bucket, destination: &Path) -> Result<()>;

    /// Returns a recursive listing of `bucket`, one object per line.
    async fn list_objects(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String>;
}
