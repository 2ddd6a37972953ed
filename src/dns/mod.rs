pub mod resolver;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use thiserror::Error;

pub use crate::core::DnsResolver;
pub use resolver::{parse_nameserver, HickoryDnsResolver};

/// Classified failure of a single lookup.
///
/// Workers switch on the variant; none of them is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The name does not exist (NXDOMAIN).
    #[error("name does not exist")]
    NameNotFound,

    /// The name exists but has no record of the requested type.
    #[error("no record of the requested type")]
    NoMatchingRecord,

    /// The lookup did not finish within the configured timeout.
    #[error("query timed out")]
    TimedOut,

    #[error("DNS resolution failed: {0}")]
    Other(String),
}

impl DnsError {
    /// True for outcomes that just mean "this candidate does not exist".
    pub fn is_expected(&self) -> bool {
        matches!(self, DnsError::NameNotFound | DnsError::NoMatchingRecord)
    }

    /// Value of the `outcome` label on `dns_queries_total`.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            DnsError::NameNotFound => "nxdomain",
            DnsError::NoMatchingRecord => "no_record",
            DnsError::TimedOut => "timeout",
            DnsError::Other(_) => "failure",
        }
    }
}
