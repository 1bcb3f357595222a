// Command line interface parsing
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{
    crate_authors,
    crate_description,
    crate_name,
    crate_version,
    value_parser,
    Arg,
    ArgAction,
    ArgMatches,
    Command,
};
use crate::common::{
    ClientConfig,
    ClientMode,
    Region,
    DEFAULT_AWS_CLI,
    DEFAULT_DOMAIN,
    DEFAULT_DOWNLOAD_DIR,
    DEFAULT_LIST_DIR,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

// Default mode that s3probe runs in
#[cfg(feature = "awscli")]
const DEFAULT_MODE: &str = "cli";

#[cfg(all(feature = "sdk", not(feature = "awscli")))]
const DEFAULT_MODE: &str = "sdk";

// Default size lookup timeout in seconds
const DEFAULT_SIZE_TIMEOUT_SECS: &str = "8";

// This should match the string values in the ClientMode FromStr impl
fn valid_modes() -> Vec<&'static str> {
    let mut modes = Vec::new();

    #[cfg(feature = "awscli")]
    modes.push("cli");

    #[cfg(feature = "sdk")]
    modes.push("sdk");

    modes
}

// Ensures that the AWS region that we're passed looks like a region name.
// We don't check against a fixed list so that new regions work without a
// rebuild.
fn is_valid_aws_region(s: &str) -> Result<String, String> {
    let is_valid = !s.is_empty() && s.chars().all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
    });

    if is_valid {
        Ok(s.into())
    }
    else {
        Err(format!("'{s}' is not a valid AWS region name"))
    }
}

// Create the clap app
fn create_app() -> Command {
    debug!("Creating CLI app");

    Command::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("AWS_CLI")
                .env("S3PROBE_AWS_CLI")
                .hide_env_values(true)
                .long("aws-cli")
                .value_name("PROGRAM")
                .help("Program to run for aws CLI commands in cli mode")
                .default_value(DEFAULT_AWS_CLI)
        )
        .arg(
            Arg::new("BUCKET")
                .value_name("BUCKET")
                .help("Bucket names to probe, in order")
                .num_args(1..)
                .required(true)
        )
        .arg(
            Arg::new("DOMAIN")
                .long("domain")
                .value_name("DOMAIN")
                .help("Domain that bucket endpoints are built under")
                .default_value(DEFAULT_DOMAIN)
        )
        .arg(
            Arg::new("DOWNLOAD")
                .long("download")
                .short('d')
                .help("Sync the contents of open buckets to the download dir")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("DOWNLOAD_DIR")
                .long("download-dir")
                .value_name("DIR")
                .help("Directory that open buckets are synced into")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_DOWNLOAD_DIR)
        )
        .arg(
            Arg::new("LIST")
                .long("list")
                .short('l')
                .help("Write the listing of open buckets to the list dir")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("LIST_DIR")
                .long("list-dir")
                .value_name("DIR")
                .help("Directory that bucket listings are written into")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_LIST_DIR)
        )
        .arg(
            Arg::new("MODE")
                .env("S3PROBE_MODE")
                .hide_env_values(true)
                .long("mode")
                .short('m')
                .value_name("MODE")
                .help("Use either the aws CLI or the AWS SDK for signed requests")
                .default_value(DEFAULT_MODE)
                .value_parser(PossibleValuesParser::new(valid_modes()))
        )
        .arg(
            Arg::new("REGION")
                .long("region")
                .short('r')
                .value_name("REGION")
                .help("Region to probe buckets in. Defaults to AWS_REGION, AWS_DEFAULT_REGION or us-west-1")
                .value_parser(is_valid_aws_region)
        )
        .arg(
            Arg::new("SIZE_TIMEOUT")
                .env("S3PROBE_SIZE_TIMEOUT")
                .hide_env_values(true)
                .long("size-timeout")
                .value_name("SECONDS")
                .help("Give up on working out a bucket size after this many seconds")
                .value_parser(value_parser!(u64).range(1..))
                .default_value(DEFAULT_SIZE_TIMEOUT_SECS)
        )
}

/// Parse the command line arguments.
pub fn parse_args() -> ArgMatches {
    debug!("Parsing command line arguments");

    create_app().get_matches()
}

/// Build a `ClientConfig` from parsed arguments.
pub fn client_config(matches: &ArgMatches) -> Result<ClientConfig> {
    // This should never fail due to the PossibleValuesParser.
    let mode = matches.get_one::<String>("MODE")
        .map_or(DEFAULT_MODE, String::as_str);

    let mode = ClientMode::from_str(mode)
        .map_err(anyhow::Error::msg)?;

    debug!("client_config: Client mode is {:?}", mode);

    let region = match matches.get_one::<String>("REGION") {
        Some(region) => Region::new().set_region(region),
        None         => Region::new(),
    };

    let bucket_names = matches.get_many::<String>("BUCKET")
        .map(|names| names.cloned().collect())
        .unwrap_or_default();

    let size_timeout = matches.get_one::<u64>("SIZE_TIMEOUT")
        .copied()
        .map_or(crate::common::DEFAULT_SIZE_TIMEOUT, Duration::from_secs);

    let mut config = ClientConfig {
        bucket_names: bucket_names,
        mode:         mode,
        region:       region,
        size_timeout: size_timeout,
        download:     matches.get_flag("DOWNLOAD"),
        list:         matches.get_flag("LIST"),
        ..Default::default()
    };

    if let Some(domain) = matches.get_one::<String>("DOMAIN") {
        config.domain = domain.to_owned();
    }

    if let Some(dir) = matches.get_one::<PathBuf>("DOWNLOAD_DIR") {
        config.download_dir = dir.to_owned();
    }

    if let Some(dir) = matches.get_one::<PathBuf>("LIST_DIR") {
        config.list_dir = dir.to_owned();
    }

    if let Some(program) = matches.get_one::<String>("AWS_CLI") {
        config.aws_cli = program.to_owned();
    }

    Ok(config)
}
