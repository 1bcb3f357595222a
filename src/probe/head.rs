// Anonymous HEAD requests
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::debug;

/// Header that S3 uses to tell us which region a bucket is really in.
pub const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// The parts of a HEAD response that the probe cares about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeadResponse {
    /// HTTP status code.
    pub status: u16,

    /// Value of the `x-amz-bucket-region` header, if present.
    pub bucket_region: Option<String>,
}

/// Ways a HEAD request can fail before producing a response.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum HeadError {
    /// The host couldn't be resolved or connected to.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Performs unauthenticated HEAD requests.
#[async_trait]
pub trait HeadRequest: Send + Sync {
    /// Sends a HEAD request to `url` without following redirects.
    async fn head(&self, url: &str) -> Result<HeadResponse, HeadError>;
}

/// `HeadRequest` implementation backed by `reqwest`.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Return a new `HttpClient` with default settings.
    pub fn new() -> Result<Self> {
        Self::from_builder(reqwest::Client::builder())
    }

    /// Return a new `HttpClient` from the given `builder`.
    ///
    /// Redirects are always disabled, a 301 carries the information we want.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
        })
    }
}

#[async_trait]
impl HeadRequest for HttpClient {
    async fn head(&self, url: &str) -> Result<HeadResponse, HeadError> {
        debug!("head: Requesting '{}'", url);

        let response = self.client.head(url)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status().as_u16();

        let bucket_region = response.headers()
            .get(BUCKET_REGION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        debug!("head: '{}' returned {} ({:?})", url, status, bucket_region);

        Ok(HeadResponse {
            status,
            bucket_region,
        })
    }
}

// Failing to resolve or connect means there is no bucket behind the name.
// Anything else is reported as-is.
fn classify_request_error(error: reqwest::Error) -> HeadError {
    if error.is_connect() {
        HeadError::Connection(error.to_string())
    }
    else {
        HeadError::Request(error.to_string())
    }
}
