// ClientConfig
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use super::{
    ClientMode,
    Region,
    DEFAULT_DOMAIN,
};
use std::path::PathBuf;
use std::time::Duration;

/// How long a bucket size lookup may run before it is abandoned.
pub const DEFAULT_SIZE_TIMEOUT: Duration = Duration::from_secs(8);

/// Program used to run aws CLI commands.
pub const DEFAULT_AWS_CLI: &str = "aws";

/// Directory that open buckets are synced into.
pub const DEFAULT_DOWNLOAD_DIR: &str = "./buckets";

/// Directory that bucket listings are written into.
pub const DEFAULT_LIST_DIR: &str = "./list-buckets";

/// Client configuration.
///
/// Everything a probe needs to know travels in here; nothing is read from
/// global state once the configuration has been built.
#[derive(Debug)]
pub struct ClientConfig {
    /// The bucket names that should be probed, in order.
    pub bucket_names: Vec<String>,

    /// The mode that `s3probe` will run in.
    ///
    /// This selects which `BucketAccess` implementation will be used.
    pub mode: ClientMode,

    /// The region that buckets are probed in.
    pub region: Region,

    /// The domain that bucket endpoints are built under.
    pub domain: String,

    /// Upper bound on the time spent working out the size of a bucket.
    pub size_timeout: Duration,

    /// Whether usable AWS credentials were found.
    ///
    /// When `false`, listings are performed with unsigned requests.
    pub credentials_configured: bool,

    /// Sync the contents of open buckets to `download_dir`.
    pub download: bool,

    /// Write the listing of open buckets to `list_dir`.
    pub list: bool,

    /// Parent directory for synced buckets.
    pub download_dir: PathBuf,

    /// Parent directory for bucket listings.
    pub list_dir: PathBuf,

    /// The aws CLI program to run in `AwsCli` mode.
    pub aws_cli: String,
}

impl Default for ClientConfig {
    /// Returns a default `ClientConfig`.
    ///
    /// If compiled with the `awscli` feature, `AwsCli` will be the default
    /// `ClientMode`, otherwise `Sdk` will be the default.
    fn default() -> Self {
        #[cfg(feature = "awscli")]
        let mode = ClientMode::AwsCli;

        #[cfg(all(feature = "sdk", not(feature = "awscli")))]
        let mode = ClientMode::Sdk;

        Self {
            bucket_names:           Vec::new(),
            mode:                   mode,
            region:                 Region::new(),
            domain:                 DEFAULT_DOMAIN.into(),
            size_timeout:           DEFAULT_SIZE_TIMEOUT,
            credentials_configured: true,
            download:               false,
            list:                   false,
            download_dir:           PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            list_dir:               PathBuf::from(DEFAULT_LIST_DIR),
            aws_cli:                DEFAULT_AWS_CLI.into(),
        }
    }
}
