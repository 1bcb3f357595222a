//! s3probe: Probe S3 bucket names for existence, region and access.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use tracing::{
    debug,
    warn,
};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "awscli")]
mod awscli;
mod cli;
mod common;
mod probe;
#[cfg(feature = "sdk")]
mod s3;

use common::{
    Bucket,
    BucketAccess,
    ClientConfig,
    ClientMode,
};
use probe::{
    HttpClient,
    Prober,
};

// Log filter used when RUST_LOG isn't set.
const DEFAULT_LOG_FILTER: &str = "warn";

// Logs go to stderr, stdout is reserved for the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Return the appropriate BucketAccess implementation for the ClientMode.
async fn client(config: &ClientConfig) -> Box<dyn BucketAccess> {
    match config.mode {
        #[cfg(feature = "awscli")]
        ClientMode::AwsCli => {
            let client = awscli::Client::new(config);
            Box::new(client)
        },
        #[cfg(feature = "sdk")]
        ClientMode::Sdk => {
            let client = s3::Client::new(config).await;
            Box::new(client)
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches    = cli::parse_args();
    let mut config = cli::client_config(&matches)?;

    debug!("main: Probing {} buckets", config.bucket_names.len());

    let access = client(&config).await;

    config.credentials_configured = access.has_credentials().await?;

    if !config.credentials_configured {
        warn!("No AWS credentials found, listings will use unsigned requests");
    }

    let head   = HttpClient::new()?;
    let prober = Prober::new(&head, access.as_ref(), &config);

    for name in &config.bucket_names {
        let bucket  = Bucket::new(name.as_str(), config.region.name());
        let outcome = prober.probe(&bucket).await?;

        println!("{outcome}");

        if !outcome.is_open() {
            debug!("main: Skipping transfers for '{}'", outcome.name());

            continue;
        }

        if config.download {
            match prober.download(&bucket).await? {
                Some(dir) => println!("{:>16} : {}", "[downloaded]", dir.display()),
                None      => println!("{:>16} : {}", "[empty]", bucket.name),
            }
        }

        if config.list {
            let path = prober.list(&bucket).await?;

            println!("{:>16} : {}", "[listed]", path.display());
        }
    }

    Ok(())
}
