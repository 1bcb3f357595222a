// Implements the S3 Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{
    ProvideCredentials,
    SharedCredentialsProvider,
};
use aws_credential_types::Credentials;
use aws_sdk_s3::client::Client as S3Client;
use aws_sdk_s3::config::Config as S3Config;
use aws_sdk_s3::config::Region as S3Region;
use aws_sdk_s3::error::{
    DisplayErrorContext,
    ProvideErrorMetadata,
};
use aws_sdk_s3::types::Object;
use aws_smithy_types_convert::date_time::DateTimeExt;
use crate::common::{
    Bucket,
    ClientConfig,
    ListingAttempt,
    ProbeError,
};
use humansize::{
    format_size,
    FormatSizeOptions,
    BINARY,
};
use std::path::{
    Component,
    Path,
    PathBuf,
};
use tokio::fs;
use tracing::debug;

/// Error codes that mean S3 refused to let us list a bucket.
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
];

/// Timestamp layout of `aws s3 ls` output.
const LISTING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The S3 `Client`.
pub struct Client {
    /// Configuration for signed requests.
    pub signed: S3Config,

    /// Configuration for anonymous requests.
    pub unsigned: S3Config,

    /// Credentials provider resolved from the environment, if any.
    pub credentials: Option<SharedCredentialsProvider>,
}

impl Client {
    /// Return a new S3 `Client` with the given `ClientConfig`.
    pub async fn new(config: &ClientConfig) -> Self {
        let region = config.region.clone();

        debug!("new: Creating S3 clients in region '{}'", region.name());

        let signed = aws_config::defaults(BehaviorVersion::latest())
            .region(region.clone())
            .load()
            .await;

        let unsigned = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .no_credentials()
            .load()
            .await;

        Self {
            credentials: signed.credentials_provider(),
            signed:      S3Config::from(&signed),
            unsigned:    S3Config::from(&unsigned),
        }
    }

    // Each bucket is addressed in its own region. Dotted bucket names don't
    // match the wildcard certificate of the virtual hosted endpoint, so they
    // use path style requests.
    fn client(&self, bucket: &Bucket, signed: bool) -> S3Client {
        let config = if signed {
            &self.signed
        }
        else {
            &self.unsigned
        };

        let config = config.to_builder()
            .region(S3Region::new(bucket.region.clone()))
            .force_path_style(bucket.name.contains('.'))
            .build();

        S3Client::from_conf(config)
    }

    /// Returns `true` if the credentials provider produced credentials.
    pub async fn check_credentials(&self) -> Result<bool, ProbeError> {
        let provider = match &self.credentials {
            Some(provider) => provider,
            None           => {
                debug!("check_credentials: No credentials provider");

                return Ok(false);
            },
        };

        classify_credentials(provider.provide_credentials().await)
    }

    /// Returns every object in `bucket`.
    pub async fn list_objects(
        &self,
        bucket: &Bucket,
        signed: bool,
    ) -> Result<Vec<Object>> {
        debug!("list_objects: Listing '{}' (signed: {})", bucket.name, signed);

        let client = self.client(bucket, signed);

        let mut continuation_token = None;
        let mut objects            = Vec::new();

        // Loop until all objects are processed.
        loop {
            let output = client.list_objects_v2()
                .bucket(&bucket.name)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .with_context(|| format!("Failed to list '{}'", bucket.name))?;

            objects.extend_from_slice(output.contents());

            // If the output was truncated we should have a
            // next_continuation_token, otherwise we're done.
            continuation_token = output.next_continuation_token()
                .map(ToOwned::to_owned);

            if !output.is_truncated().unwrap_or(false) || continuation_token.is_none() {
                break;
            }
        }

        debug!("list_objects: Found {} objects in '{}'", objects.len(), bucket.name);

        Ok(objects)
    }

    /// Returns the total size of all objects in `bucket` in bytes.
    pub async fn size_objects(&self, bucket: &Bucket, signed: bool) -> Result<u64> {
        let size = self.list_objects(bucket, signed)
            .await?
            .iter()
            .filter_map(|object| object.size())
            .filter_map(|size| u64::try_from(size).ok())
            .sum();

        Ok(size)
    }

    /// Attempt a single page signed listing of `bucket`.
    pub async fn probe_listing(&self, bucket: &Bucket) -> ListingAttempt {
        let output = self.client(bucket, true)
            .list_objects_v2()
            .bucket(&bucket.name)
            .max_keys(1)
            .send()
            .await;

        match output {
            Ok(_)  => ListingAttempt::Listed,
            Err(e) => {
                let code = e.as_service_error().and_then(|e| e.code());

                debug!("probe_listing: '{}' failed with {:?}", bucket.name, code);

                match code {
                    Some(code) if ACCESS_DENIED_CODES.contains(&code) => {
                        ListingAttempt::Denied
                    },
                    _ => ListingAttempt::Failed {
                        reason: DisplayErrorContext(&e).to_string(),
                    },
                }
            },
        }
    }

    /// Download every object in `bucket` into `destination` with anonymous
    /// requests, returning the number of objects written.
    pub async fn download_objects(
        &self,
        bucket: &Bucket,
        destination: &Path,
    ) -> Result<usize> {
        let objects = self.list_objects(bucket, false).await?;
        let client  = self.client(bucket, false);

        let mut written = 0;

        for object in &objects {
            let Some(key) = object.key() else {
                continue;
            };

            let Some(path) = object_path(destination, key) else {
                debug!("download_objects: Skipping key '{}'", key);

                continue;
            };

            debug!("download_objects: '{}' -> {:?}", key, path);

            let output = client.get_object()
                .bucket(&bucket.name)
                .key(key)
                .send()
                .await
                .with_context(|| format!("Failed to get '{}'", key))?;

            let data = output.body
                .collect()
                .await
                .with_context(|| format!("Failed to read '{}'", key))?
                .into_bytes();

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&path, data).await?;

            written += 1;
        }

        Ok(written)
    }
}

/// Map a credentials lookup onto whether credentials are configured.
///
/// Only `CredentialsNotLoaded` means that there are no credentials, any
/// other provider error is passed on.
pub fn classify_credentials(
    result: Result<Credentials, CredentialsError>,
) -> Result<bool, ProbeError> {
    match result {
        Ok(_) => Ok(true),
        Err(CredentialsError::CredentialsNotLoaded(_)) => {
            debug!("classify_credentials: No credentials configured");

            Ok(false)
        },
        Err(e) => {
            Err(ProbeError::CredentialCheck(DisplayErrorContext(&e).to_string()))
        },
    }
}

/// Returns a human readable size, the way `aws s3 ls --human-readable`
/// does.
pub fn human_size(bytes: u64) -> String {
    // Sizes below a KiB are spelled out in bytes.
    match bytes {
        1              => "1 Byte".into(),
        0..=1023       => format!("{bytes} Bytes"),
        _              => {
            let options = FormatSizeOptions::from(BINARY).decimal_places(1);

            format_size(bytes, options)
        },
    }
}

/// Format `object` as a line of `aws s3 ls --recursive` output.
pub fn listing_line(object: &Object) -> String {
    let timestamp = object.last_modified()
        .and_then(|timestamp| timestamp.to_chrono_utc().ok())
        .map(|timestamp| timestamp.format(LISTING_TIME_FORMAT).to_string())
        .unwrap_or_else(|| " ".repeat(19));

    format!(
        "{} {:>10} {}",
        timestamp,
        object.size().unwrap_or_default(),
        object.key().unwrap_or_default(),
    )
}

// Where `key` should be written below `destination`. Directory markers and
// keys that would escape `destination` have no local path.
fn object_path(destination: &Path, key: &str) -> Option<PathBuf> {
    if key.is_empty() || key.ends_with('/') {
        return None;
    }

    let relative = Path::new(key);

    let is_contained = relative.components()
        .all(|component| matches!(component, Component::Normal(_)));

    if !is_contained {
        return None;
    }

    Some(destination.join(relative))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use aws_credential_types::provider::future;
    use aws_sdk_s3::primitives::{
        DateTime,
        DateTimeFormat,
    };
    use aws_smithy_http_client::test_util::{
        ReplayEvent,
        StaticReplayClient,
    };
    use aws_smithy_types::body::SdkBody;
    use pretty_assertions::assert_eq;

    // S3 tests in other modules import this too.
    pub fn mock_client(responses: Vec<(u16, String)>) -> Client {
        let events = responses
            .into_iter()
            .map(|(status, body)| {
                ReplayEvent::new(
                    http::Request::builder()
                        .body(SdkBody::empty())
                        .unwrap(),

                    http::Response::builder()
                        .status(status)
                        .body(SdkBody::from(body))
                        .unwrap(),
                )
            })
            .collect();

        let http_client = StaticReplayClient::new(events);

        let conf = S3Config::builder()
            .behavior_version_latest()
            .credentials_provider(Credentials::for_tests())
            .http_client(http_client)
            .region(S3Region::new("eu-west-1"))
            .build();

        Client {
            signed:      conf.clone(),
            unsigned:    conf,
            credentials: Some(SharedCredentialsProvider::new(Credentials::for_tests())),
        }
    }

    // S3 tests in other modules import this too.
    pub fn s3_list_objects(objects: &[(&str, u64)], next_token: Option<&str>) -> String {
        let contents: String = objects
            .iter()
            .map(|(key, size)| {
                format!(
                    "<Contents>\
                        <Key>{key}</Key>\
                        <LastModified>2020-03-01T20:59:00.000Z</LastModified>\
                        <ETag>&quot;d41d8cd98f00b204e9800998ecf8427e&quot;</ETag>\
                        <Size>{size}</Size>\
                        <StorageClass>STANDARD</StorageClass>\
                    </Contents>"
                )
            })
            .collect();

        let truncated = match next_token {
            Some(token) => format!(
                "<IsTruncated>true</IsTruncated><NextContinuationToken>{token}</NextContinuationToken>"
            ),
            None => "<IsTruncated>false</IsTruncated>".to_string(),
        };

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                <Name>my-bucket-1</Name>\
                <Prefix></Prefix>\
                <KeyCount>{}</KeyCount>\
                <MaxKeys>1000</MaxKeys>\
                {truncated}\
                {contents}\
            </ListBucketResult>",
            objects.len(),
        )
    }

    // S3 tests in other modules import this too.
    pub fn s3_error(code: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <Error>\
                <Code>{code}</Code>\
                <Message>{code}</Message>\
                <RequestId>4442587FB7D0A2F9</RequestId>\
                <HostId>aHostId</HostId>\
            </Error>"
        )
    }

    fn bucket() -> Bucket {
        Bucket::new("my-bucket-1", "eu-west-1")
    }

    #[derive(Debug)]
    struct FailingProvider {
        loaded: bool,
    }

    impl ProvideCredentials for FailingProvider {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            let error = if self.loaded {
                CredentialsError::provider_error("credential_process exited with 1")
            }
            else {
                CredentialsError::not_loaded("no credentials in the environment")
            };

            future::ProvideCredentials::ready(Err(error))
        }
    }

    #[tokio::test]
    async fn test_check_credentials() {
        let mut client = mock_client(Vec::new());
        assert!(client.check_credentials().await.unwrap());

        client.credentials = None;
        assert!(!client.check_credentials().await.unwrap());

        let provider = FailingProvider { loaded: false };
        client.credentials = Some(SharedCredentialsProvider::new(provider));
        assert!(!client.check_credentials().await.unwrap());

        let provider = FailingProvider { loaded: true };
        client.credentials = Some(SharedCredentialsProvider::new(provider));

        let ret = client.check_credentials().await;
        assert!(matches!(ret, Err(ProbeError::CredentialCheck(_))));
    }

    #[tokio::test]
    async fn test_list_objects_pages() {
        let client = mock_client(vec![
            (200, s3_list_objects(&[("a.txt", 1024), ("b.txt", 2048)], Some("page-2"))),
            (200, s3_list_objects(&[("c.txt", 512)], None)),
        ]);

        let ret = client.list_objects(&bucket(), true).await.unwrap();

        let keys: Vec<&str> = ret.iter()
            .filter_map(|object| object.key())
            .collect();

        assert_eq!(keys, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[tokio::test]
    async fn test_size_objects() {
        let client = mock_client(vec![
            (200, s3_list_objects(&[("a.txt", 1024), ("b.txt", 2048)], None)),
        ]);

        let ret = client.size_objects(&bucket(), false).await.unwrap();

        assert_eq!(ret, 3072);
    }

    #[tokio::test]
    async fn test_probe_listing() {
        let tests = vec![
            (200, s3_list_objects(&[("a.txt", 1)], None), true, false),
            (403, s3_error("AccessDenied"), false, true),
            (403, s3_error("AllAccessDisabled"), false, true),
            (404, s3_error("NoSuchBucket"), false, false),
        ];

        for test in tests {
            let client = mock_client(vec![(test.0, test.1)]);
            let ret    = client.probe_listing(&bucket()).await;

            match ret {
                ListingAttempt::Listed      => assert!(test.2),
                ListingAttempt::Denied      => assert!(test.3),
                ListingAttempt::Failed { .. } => assert!(!test.2 && !test.3),
                ListingAttempt::ErrorMarker => panic!("unexpected error marker"),
            }
        }
    }

    #[tokio::test]
    async fn test_download_objects() {
        let root = tempfile::TempDir::new().unwrap();

        let listing = s3_list_objects(
            &[
                ("docs/a.txt", 5),
                ("../escape.txt", 4),
                ("folder/", 0),
            ],
            None,
        );

        let client = mock_client(vec![
            (200, listing),
            (200, "hello".to_string()),
        ]);

        let ret = client.download_objects(&bucket(), root.path())
            .await
            .unwrap();

        assert_eq!(ret, 1);

        let contents = std::fs::read_to_string(root.path().join("docs").join("a.txt"))
            .unwrap();

        assert_eq!(contents, "hello");
        assert!(!root.path().join("folder").exists());
    }

    #[test]
    fn test_human_size() {
        let tests = vec![
            (4_509_715_661, "4.2 GiB"),
            (1_536,         "1.5 KiB"),
            (512,           "512 Bytes"),
            (1,             "1 Byte"),
            (0,             "0 Bytes"),
        ];

        for test in tests {
            let bytes    = test.0;
            let expected = test.1;

            assert_eq!(human_size(bytes), expected);
        }
    }

    #[test]
    fn test_listing_line() {
        let timestamp = DateTime::from_str(
            "2020-03-01T20:59:00Z",
            DateTimeFormat::DateTime,
        ).unwrap();

        let object = Object::builder()
            .key("docs/a.txt")
            .size(1024)
            .last_modified(timestamp)
            .build();

        assert_eq!(listing_line(&object), "2020-03-01 20:59:00       1024 docs/a.txt");
    }

    #[test]
    fn test_object_path() {
        let destination = Path::new("/tmp/buckets/my-bucket-1");

        let tests = vec![
            ("a.txt",          Some(destination.join("a.txt"))),
            ("docs/a.txt",     Some(destination.join("docs/a.txt"))),
            ("folder/",        None),
            ("",               None),
            ("../escape.txt",  None),
            ("/etc/passwd",    None),
            ("docs/../../x",   None),
        ];

        for test in tests {
            let key      = test.0;
            let expected = test.1;

            assert_eq!(object_path(destination, key), expected, "{key:?}");
        }
    }
}
