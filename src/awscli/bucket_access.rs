// Implement the BucketAccess trait for the awscli::Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    bail,
    Context,
    Result,
};
use async_trait::async_trait;
use crate::common::{
    Bucket,
    BucketAccess,
    ListingAttempt,
    ProbeError,
};
use std::path::Path;
use super::client::{
    classify_identity_failure,
    classify_listing,
    fallback_listing_args,
    identity_args,
    listing_args,
    parse_total_size,
    sync_args,
    Client,
};
use super::runner::CommandRunner;
use tracing::debug;

#[async_trait]
impl<R> BucketAccess for Client<R>
where
    R: CommandRunner,
{
    /// Ask STS for our account ID.
    async fn has_credentials(&self) -> Result<bool, ProbeError> {
        debug!("has_credentials: Checking caller identity");

        let output = self.runner.output(&identity_args())
            .await
            .map_err(|e| {
                ProbeError::CredentialCheck(format!("failed to run aws CLI: {e}"))
            })?;

        if output.success {
            return Ok(true);
        }

        classify_identity_failure(&output)
    }

    async fn authenticated_listing(&self, bucket: &Bucket) -> ListingAttempt {
        debug!("authenticated_listing: Listing '{}'", bucket.name);

        match self.runner.output(&fallback_listing_args(bucket)).await {
            Ok(output) => classify_listing(&output),
            Err(e) => {
                ListingAttempt::Failed {
                    reason: format!("failed to run aws CLI: {e}"),
                }
            },
        }
    }

    async fn bucket_size(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String> {
        let args   = listing_args(bucket, true, authenticated);
        let output = self.runner.output(&args)
            .await
            .context("Failed to run aws CLI")?;

        if !output.success {
            bail!(
                "Sizing '{}' failed: {}",
                bucket.name,
                output.stderr.trim(),
            );
        }

        parse_total_size(&output.stdout)
            .with_context(|| format!("Failed to size '{}'", bucket.name))
    }

    async fn sync_bucket(&self, bucket: &Bucket, destination: &Path) -> Result<()> {
        let args = sync_args(bucket, destination);

        let success = self.runner.status(&args)
            .await
            .context("Failed to run aws CLI")?;

        if !success {
            bail!("Syncing '{}' failed", bucket.name);
        }

        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String> {
        let args   = listing_args(bucket, false, authenticated);
        let output = self.runner.output(&args)
            .await
            .context("Failed to run aws CLI")?;

        if !output.success {
            bail!(
                "Listing '{}' failed: {}",
                bucket.name,
                output.stderr.trim(),
            );
        }

        Ok(output.stdout)
    }
}
