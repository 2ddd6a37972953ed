//! Core domain types and service traits for subbrute
//!
//! This module defines the data that flows out of a scan and the trait
//! contracts at the two seams workers talk through: DNS resolution and
//! console output.

use crate::dns::DnsError;
use crate::stats::StatsSnapshot;
use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;
use std::fmt;
use std::time::Duration;

/// A candidate that resolved, with the values of its records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredEntry {
    /// The fully-qualified candidate name, e.g. `www.example.com`.
    pub name: String,
    /// Record values in the order the resolver returned them.
    pub records: Vec<String>,
}

impl DiscoveredEntry {
    pub fn new(name: impl Into<String>, records: Vec<String>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl fmt::Display for DiscoveredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.records.join(", "))
    }
}

/// The outcome of a finished scan, built by the coordinator once every
/// worker has stopped.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Wall-clock time from worker spawn to the last worker stopping.
    pub elapsed: Duration,
    /// Discovered entries in completion order.
    pub entries: Vec<DiscoveredEntry>,
    /// True if the scan was cut short by an external interrupt.
    pub interrupted: bool,
    /// Labels that were never taken from the queue.
    pub pending: usize,
    pub stats: StatsSnapshot,
}

impl ScanReport {
    /// Number of discovered entries.
    pub fn found(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Resolves a fully-qualified name for a single record type.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolves `name` for `record_type`.
    ///
    /// # Returns
    /// * `Ok(values)` with at least one record value on success
    /// * `Err(DnsError)` classified as name-not-found, no-matching-record,
    ///   timeout, or any other failure
    async fn resolve(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, DnsError>;
}

/// Receives scan events for display.
///
/// Implementations are called from worker tasks and must not block for long
/// or fail loudly; output is best-effort.
pub trait Output: Send + Sync {
    /// A short descriptive name, used in logs.
    fn name(&self) -> &str;

    /// A candidate resolved and was recorded.
    fn discovered(&self, entry: &DiscoveredEntry);

    /// A candidate's lookup timed out. Only called when timeout reporting
    /// is enabled.
    fn timed_out(&self, name: &str);

    /// The scan was interrupted. Called at most once per scan.
    fn interrupted(&self);

    /// The scan finished and every worker has stopped.
    fn finished(&self, report: &ScanReport);
}
