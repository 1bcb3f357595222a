// Probes candidate bucket names
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use crate::common::{
    is_valid_bucket_name,
    Bucket,
    BucketAccess,
    ClientConfig,
    ListingAttempt,
    ProbeError,
    ProbeOutcome,
};
use super::head::{
    HeadError,
    HeadRequest,
};
use super::size::bucket_size;
use tracing::{
    debug,
    warn,
};

/// Works out whether candidate buckets exist and whether we can read them.
///
/// Every probe starts with an anonymous HEAD request. Credentials are only
/// used when that request is refused with a 403, which keeps the number of
/// signed requests down for the common case of a name that doesn't exist.
pub struct Prober<'a, H: ?Sized, A: ?Sized> {
    pub(super) head:   &'a H,
    pub(super) access: &'a A,
    pub(super) config: &'a ClientConfig,
}

impl<'a, H, A> Prober<'a, H, A>
where
    H: HeadRequest + ?Sized,
    A: BucketAccess + ?Sized,
{
    /// Return a new `Prober`.
    pub fn new(head: &'a H, access: &'a A, config: &'a ClientConfig) -> Self {
        Self {
            head,
            access,
            config,
        }
    }

    /// Classify `bucket`.
    ///
    /// Unclassifiable responses are returned as errors, the caller should
    /// stop when it sees one.
    pub async fn probe(&self, bucket: &Bucket) -> Result<ProbeOutcome, ProbeError> {
        if !is_valid_bucket_name(&bucket.name) {
            debug!("probe: '{}' is not a valid bucket name", bucket.name);

            return Ok(ProbeOutcome::InvalidName {
                name: bucket.name.clone(),
            });
        }

        let url = bucket.endpoint(&self.config.domain);

        let response = match self.head.head(&url).await {
            Ok(response) => response,
            Err(HeadError::Connection(e)) => {
                debug!("probe: Couldn't connect to '{}': {}", url, e);

                return Ok(self.not_found(bucket));
            },
            Err(HeadError::Request(e)) => return Err(ProbeError::Http(e)),
        };

        match response.status {
            200 => self.open(bucket).await,
            301 => {
                let correct_region = response.bucket_region
                    .ok_or_else(|| ProbeError::MissingRegionHeader {
                        bucket: bucket.name.clone(),
                    })?;

                Ok(ProbeOutcome::WrongRegion {
                    name: bucket.name.clone(),
                    correct_region,
                })
            },
            403 => self.fallback_listing(bucket).await,
            404 => Ok(self.not_found(bucket)),
            status => {
                Err(ProbeError::UnhandledStatus {
                    status,
                    bucket: bucket.name.clone(),
                    region: bucket.region.clone(),
                })
            },
        }
    }

    // The bucket is readable, find out how big it is.
    async fn open(&self, bucket: &Bucket) -> Result<ProbeOutcome, ProbeError> {
        let size = bucket_size(self.access, bucket, self.config).await?;

        Ok(ProbeOutcome::Open {
            name:   bucket.name.clone(),
            region: bucket.region.clone(),
            size,
        })
    }

    // Anonymous listing was denied, see if our credentials do any better.
    async fn fallback_listing(
        &self,
        bucket: &Bucket,
    ) -> Result<ProbeOutcome, ProbeError> {
        let forbidden = ProbeOutcome::Forbidden {
            name:   bucket.name.clone(),
            region: bucket.region.clone(),
        };

        match self.access.authenticated_listing(bucket).await {
            ListingAttempt::Listed => {
                debug!("probe: '{}' is listable with credentials", bucket.name);

                self.open(bucket).await
            },
            ListingAttempt::ErrorMarker | ListingAttempt::Denied => {
                Ok(forbidden)
            },
            ListingAttempt::Failed { reason } => {
                // We can't tell a denial from a transient failure here.
                warn!(
                    "Authenticated listing of '{}' failed, reporting as forbidden: {}",
                    bucket.name,
                    reason,
                );

                Ok(forbidden)
            },
        }
    }

    fn not_found(&self, bucket: &Bucket) -> ProbeOutcome {
        ProbeOutcome::NotFound {
            name: bucket.name.clone(),
        }
    }
}
