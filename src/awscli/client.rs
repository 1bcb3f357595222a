// Implements the aws CLI Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    anyhow,
    Context,
    Result,
};
use crate::common::{
    Bucket,
    ClientConfig,
    ListingAttempt,
    ProbeError,
};
use std::path::Path;
use super::runner::{
    AwsCommand,
    CommandOutput,
};
use tracing::debug;

/// What the aws CLI prints to stderr when it can't find any credentials.
pub const MISSING_CREDENTIALS: &str = "Unable to locate credentials";

/// Prefix of the error messages the aws CLI prints for failed API calls.
pub const ERROR_MARKER: &str = "An error occurred (";

/// Error code S3 returns when a listing is refused.
const ACCESS_DENIED: &str = "AccessDenied";

/// The aws CLI `Client`.
pub struct Client<R = AwsCommand> {
    /// Runs the aws CLI commands.
    pub runner: R,
}

impl Client<AwsCommand> {
    /// Return a new aws CLI `Client` with the given `ClientConfig`.
    pub fn new(config: &ClientConfig) -> Self {
        debug!("new: Creating aws CLI client using '{}'", config.aws_cli);

        Self::with_runner(AwsCommand::new(config.aws_cli.as_str()))
    }
}

impl<R> Client<R> {
    /// Return a new aws CLI `Client` running commands with `runner`.
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
        }
    }
}

/// Arguments for asking STS who we are.
pub fn identity_args() -> Vec<String> {
    to_args(&[
        "sts",
        "get-caller-identity",
        "--output",
        "text",
        "--query",
        "Account",
    ])
}

/// Arguments for the plain, signed listing used when an anonymous probe was
/// refused.
pub fn fallback_listing_args(bucket: &Bucket) -> Vec<String> {
    let mut args = to_args(&["s3", "ls"]);
    args.push(bucket.uri());
    args
}

/// Arguments for a recursive listing of `bucket`.
///
/// With `summarize` the listing ends with human readable totals.
pub fn listing_args(
    bucket: &Bucket,
    summarize: bool,
    authenticated: bool,
) -> Vec<String> {
    let mut args = to_args(&["s3", "ls"]);

    if summarize {
        args.extend(to_args(&["--summarize", "--human-readable"]));
    }

    args.push("--recursive".into());

    if !authenticated {
        args.push("--no-sign-request".into());
    }

    args.push(bucket.uri());
    args
}

/// Arguments for an unsigned sync of `bucket` into `destination`.
pub fn sync_args(bucket: &Bucket, destination: &Path) -> Vec<String> {
    vec![
        "s3".into(),
        "sync".into(),
        bucket.uri(),
        destination.display().to_string(),
        "--no-sign-request".into(),
    ]
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.to_string())
        .collect()
}

/// Classify a failed identity check.
///
/// Only the aws CLI's "credentials are missing" message means `false`,
/// every other failure is passed on.
pub fn classify_identity_failure(output: &CommandOutput) -> Result<bool, ProbeError> {
    if output.stderr.contains(MISSING_CREDENTIALS) {
        debug!("classify_identity_failure: No credentials configured");

        return Ok(false);
    }

    Err(ProbeError::CredentialCheck(output.stderr.trim().to_string()))
}

/// Classify the output of the signed fallback listing.
pub fn classify_listing(output: &CommandOutput) -> ListingAttempt {
    if output.success {
        // stderr is folded in, the same way a shell redirect would.
        let combined = format!("{}{}", output.stdout, output.stderr);

        if combined.contains(ERROR_MARKER) {
            return ListingAttempt::ErrorMarker;
        }

        return ListingAttempt::Listed;
    }

    if output.stderr.contains(ACCESS_DENIED) {
        return ListingAttempt::Denied;
    }

    ListingAttempt::Failed {
        reason: output.stderr.trim().to_string(),
    }
}

/// Extract the total size from `aws s3 ls --summarize --human-readable`
/// output.
///
/// The last line looks like `   Total Size: 4.2 GiB`, everything to the
/// right of the first colon is the size.
pub fn parse_total_size(output: &str) -> Result<String> {
    let last_line = output.lines()
        .last()
        .context("listing output was empty")?;

    let (_, size) = last_line.split_once(':')
        .ok_or_else(|| anyhow!("unexpected summary line: '{}'", last_line))?;

    Ok(size.trim().to_string())
}
