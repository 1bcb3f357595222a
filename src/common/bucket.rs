// Definition of a bucket to probe
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Domain that bucket endpoints live under unless told otherwise.
pub const DEFAULT_DOMAIN: &str = "amazonaws.com";

/// Represents a candidate S3 bucket.
///
/// This will always have a `name` and the `region` that it should be probed
/// in. Neither is validated on construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bucket {
    pub name:   String,
    pub region: String,
}

impl Bucket {
    /// Return a new `Bucket` with the given `name` and `region`.
    pub fn new<N, R>(name: N, region: R) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        Self {
            name:   name.into(),
            region: region.into(),
        }
    }

    /// Returns the virtual-hosted style endpoint for the bucket under the
    /// given `domain`.
    pub fn endpoint(&self, domain: &str) -> String {
        format!("http://{}.s3-{}.{}", self.name, self.region, domain)
    }

    /// Returns the `s3://` URI for the bucket.
    pub fn uri(&self) -> String {
        format!("s3://{}", self.name)
    }
}
