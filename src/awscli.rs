// Imports all of the components needed for awscli::client
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Implementation of the `BucketAccess` trait for our aws CLI `Client`.
mod bucket_access;

/// aws CLI `Client`.
mod client;

/// Running aws CLI commands.
mod runner;

pub use client::*;
