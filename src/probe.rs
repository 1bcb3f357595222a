// Imports all of the components needed for probing buckets
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Anonymous HEAD requests against bucket endpoints.
mod head;

/// `Prober` and the probe decision procedure.
mod prober;

/// Bounded bucket size lookups.
mod size;

/// Downloading and listing open buckets.
mod transfer;

pub use head::*;
pub use prober::*;
