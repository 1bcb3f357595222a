// Common traits and types
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bucket;
mod bucket_access;
mod bucket_name;
mod client_config;
mod client_mode;
mod error;
mod outcome;
mod region;

pub use bucket::*;
pub use bucket_access::*;
pub use bucket_name::*;
pub use client_config::*;
pub use client_mode::*;
pub use error::*;
pub use outcome::*;
pub use region::*;
