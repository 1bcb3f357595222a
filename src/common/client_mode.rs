// Client modes
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use std::str::FromStr;

/// Valid modes that s3probe can operate in.
///
/// The mode selects which `BucketAccess` implementation performs the
/// authenticated listing, sizing and transfer work. The anonymous HEAD
/// probe is the same in every mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClientMode {
    /// Shell out to the `aws` command line tool.
    #[cfg(feature = "awscli")]
    AwsCli,

    /// Use the AWS SDK directly.
    #[cfg(feature = "sdk")]
    Sdk,
}

// This is used to work out which mode we're in after parsing the CLI.
// We shouldn't ever hit the error condition here.
impl FromStr for ClientMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            #[cfg(feature = "awscli")]
            "cli" => Ok(Self::AwsCli),
            #[cfg(feature = "sdk")]
            "sdk" => Ok(Self::Sdk),
            _     => Err("no match"),
        }
    }
}
