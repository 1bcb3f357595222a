// Probe outcomes
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use std::fmt;

/// Reason reported when a size lookup ran out of time.
pub const SIZE_TIMEOUT: &str = "timeout";

/// The size of an open bucket, as far as we could tell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SizeResult {
    /// Human readable total size, e.g. `4.2 GiB`.
    Known(String),

    /// The size couldn't be determined, for the given reason.
    Unknown(&'static str),
}

impl fmt::Display for SizeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Known(size)     => write!(f, "{size}"),
            Self::Unknown(reason) => write!(f, "Unknown Size - {reason}"),
        }
    }
}

/// Classification of a single probed bucket name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProbeOutcome {
    /// The name can't be a bucket name.
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// There is no bucket with this name.
    NotFound {
        /// The probed name.
        name: String,
    },

    /// The bucket exists, but in another region.
    WrongRegion {
        /// The probed name.
        name: String,
        /// Region reported by the endpoint.
        correct_region: String,
    },

    /// The bucket exists but can't be listed.
    Forbidden {
        /// The probed name.
        name: String,
        /// Region the bucket was found in.
        region: String,
    },

    /// The bucket exists and can be listed.
    Open {
        /// The probed name.
        name: String,
        /// Region the bucket was found in.
        region: String,
        /// Total size of the bucket contents.
        size: SizeResult,
    },
}

impl ProbeOutcome {
    /// Returns `true` if the bucket can be listed.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Returns the bucket name the outcome is about.
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidName { name }       => name,
            Self::NotFound { name }          => name,
            Self::WrongRegion { name, .. }   => name,
            Self::Forbidden { name, .. }     => name,
            Self::Open { name, .. }          => name,
        }
    }
}

// One report line per outcome, with the status right aligned so that names
// line up in a column.
impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidName { name } => {
                write!(f, "{:>16} : {}", "[invalid]", name)
            },
            Self::NotFound { name } => {
                write!(f, "{:>16} : {}", "[not found]", name)
            },
            Self::WrongRegion { name, correct_region } => {
                write!(f, "{:>16} : {} : {}", "[wrong region]", name, correct_region)
            },
            Self::Forbidden { name, region } => {
                write!(f, "{:>16} : {} : {}", "[forbidden]", name, region)
            },
            Self::Open { name, region, size } => {
                write!(f, "{:>16} : {} : {} : {}", "[found]", name, region, size)
            },
        }
    }
}
