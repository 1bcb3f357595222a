// Bounded bucket size lookups
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use crate::common::{
    Bucket,
    BucketAccess,
    ClientConfig,
    SizeResult,
    SIZE_TIMEOUT,
};
use tokio::time::timeout;
use tracing::debug;

/// Returns the size of `bucket`, giving up after `config.size_timeout`.
///
/// Sizing a large bucket means listing every object in it, so the size is
/// best effort. Running out of time yields `SizeResult::Unknown`, while a
/// listing that fails outright is an error.
pub async fn bucket_size<A>(
    access: &A,
    bucket: &Bucket,
    config: &ClientConfig,
) -> Result<SizeResult>
where
    A: BucketAccess + ?Sized,
{
    let authenticated = config.credentials_configured;

    debug!(
        "bucket_size: Sizing '{}' (authenticated: {}, timeout: {:?})",
        bucket.name,
        authenticated,
        config.size_timeout,
    );

    let lookup = access.bucket_size(bucket, authenticated);

    match timeout(config.size_timeout, lookup).await {
        Ok(size) => {
            let size = size?;

            debug!("bucket_size: size for '{}' is '{}'", bucket.name, size);

            Ok(SizeResult::Known(size))
        },
        Err(_) => {
            debug!("bucket_size: Timed out sizing '{}'", bucket.name);

            Ok(SizeResult::Unknown(SIZE_TIMEOUT))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::prober::tests::MockAccess;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn test_bucket_size() {
        let access = MockAccess::default();
        let config = ClientConfig::default();
        let bucket = Bucket::new("my-bucket-1", "us-west-1");

        let ret = bucket_size(&access, &bucket, &config).await.unwrap();

        assert_eq!(ret, SizeResult::Known("4.2 GiB".into()));
    }

    #[tokio::test]
    async fn test_bucket_size_timeout() {
        let access = MockAccess {
            size_delay: Some(Duration::from_secs(5)),
            ..Default::default()
        };

        let config = ClientConfig {
            size_timeout: Duration::from_millis(20),
            ..Default::default()
        };

        let bucket = Bucket::new("my-bucket-1", "us-west-1");

        let ret = bucket_size(&access, &bucket, &config).await.unwrap();

        assert_eq!(ret, SizeResult::Unknown("timeout"));
    }
}
