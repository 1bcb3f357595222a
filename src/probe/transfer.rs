// Downloading and listing open buckets
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use crate::common::{
    Bucket,
    BucketAccess,
    ProbeError,
};
use std::io;
use std::path::{
    Path,
    PathBuf,
};
use super::head::HeadRequest;
use super::prober::Prober;
use tokio::fs;
use tracing::debug;

impl<'a, H, A> Prober<'a, H, A>
where
    H: HeadRequest + ?Sized,
    A: BucketAccess + ?Sized,
{
    // Probe again so that we only ever transfer from buckets that are open
    // right now.
    async fn ensure_open(&self, bucket: &Bucket) -> Result<(), ProbeError> {
        let outcome = self.probe(bucket).await?;

        if outcome.is_open() {
            return Ok(());
        }

        debug!("ensure_open: '{}' is not open: {:?}", bucket.name, outcome);

        Err(ProbeError::NotOpen {
            bucket: bucket.name.clone(),
        })
    }

    /// Sync the contents of `bucket` into `{download_dir}/{name}`.
    ///
    /// Returns the directory the objects were written to, or `None` if
    /// nothing could be downloaded and the empty directory was removed.
    pub async fn download(
        &self,
        bucket: &Bucket,
    ) -> Result<Option<PathBuf>, ProbeError> {
        self.ensure_open(bucket).await?;

        let destination = self.config.download_dir.join(&bucket.name);

        debug!("download: Syncing '{}' to {:?}", bucket.name, destination);

        fs::create_dir_all(&destination).await?;

        self.access.sync_bucket(bucket, &destination).await?;

        if is_empty_dir(&destination).await? {
            debug!("download: Nothing synced, removing {:?}", destination);

            fs::remove_dir(&destination).await?;

            return Ok(None);
        }

        Ok(Some(destination))
    }

    /// Write a recursive listing of `bucket` to `{list_dir}/{name}.txt`.
    ///
    /// Returns the path of the listing file.
    pub async fn list(&self, bucket: &Bucket) -> Result<PathBuf, ProbeError> {
        self.ensure_open(bucket).await?;

        fs::create_dir_all(&self.config.list_dir).await?;

        let authenticated = self.config.credentials_configured;

        let listing = self.access.list_objects(bucket, authenticated)
            .await
            .map_err(|e| {
                debug!("list: Listing '{}' failed: {:#}", bucket.name, e);

                ProbeError::NotOpen {
                    bucket: bucket.name.clone(),
                }
            })?;

        let path = self.config.list_dir.join(format!("{}.txt", bucket.name));

        debug!("list: Writing listing of '{}' to {:?}", bucket.name, path);

        fs::write(&path, listing).await?;

        Ok(path)
    }
}

async fn is_empty_dir(path: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(path).await?;

    Ok(entries.next_entry().await?.is_none())
}
