// Implement the BucketAccess trait for the s3::Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use crate::common::{
    Bucket,
    BucketAccess,
    ListingAttempt,
    ProbeError,
};
use std::path::Path;
use super::client::{
    human_size,
    listing_line,
    Client,
};
use tracing::debug;

#[async_trait]
impl BucketAccess for Client {
    async fn has_credentials(&self) -> Result<bool, ProbeError> {
        debug!("has_credentials: Resolving default credentials chain");

        self.check_credentials().await
    }

    async fn authenticated_listing(&self, bucket: &Bucket) -> ListingAttempt {
        debug!("authenticated_listing: Listing '{}'", bucket.name);

        self.probe_listing(bucket).await
    }

    async fn bucket_size(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String> {
        let size = self.size_objects(bucket, authenticated).await?;

        debug!("bucket_size: '{}' is {} bytes", bucket.name, size);

        Ok(human_size(size))
    }

    async fn sync_bucket(&self, bucket: &Bucket, destination: &Path) -> Result<()> {
        let written = self.download_objects(bucket, destination).await?;

        debug!("sync_bucket: Wrote {} objects from '{}'", written, bucket.name);

        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &Bucket,
        authenticated: bool,
    ) -> Result<String> {
        let listing: String = Client::list_objects(self, bucket, authenticated)
            .await?
            .iter()
            .map(|object| listing_line(object) + "\n")
            .collect();

        Ok(listing)
    }
}
