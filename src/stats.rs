//! Per-scan counters.
//!
//! Workers bump these lock-free; the coordinator reads a snapshot once the
//! scan has stopped.
use crate::dns::DnsError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    taken: AtomicUsize,
    discovered: AtomicUsize,
    not_found: AtomicUsize,
    no_record: AtomicUsize,
    timed_out: AtomicUsize,
    failed: AtomicUsize,
    completed_after_cancel: AtomicUsize,
}

/// Shared handle to the scan counters.
#[derive(Clone, Debug, Default)]
pub struct ScanStats {
    counters: Arc<Counters>,
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub taken: usize,
    pub discovered: usize,
    pub not_found: usize,
    pub no_record: usize,
    pub timed_out: usize,
    pub failed: usize,
    /// Lookups that were already in flight when cancellation was requested.
    pub completed_after_cancel: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_taken(&self) {
        self.counters.taken.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts the outcome of one lookup.
    pub fn record_outcome(&self, outcome: &Result<Vec<String>, DnsError>) {
        let counter = match outcome {
            Ok(_) => &self.counters.discovered,
            Err(DnsError::NameNotFound) => &self.counters.not_found,
            Err(DnsError::NoMatchingRecord) => &self.counters.no_record,
            Err(DnsError::TimedOut) => &self.counters.timed_out,
            Err(DnsError::Other(_)) => &self.counters.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_after_cancel(&self) {
        self.counters
            .completed_after_cancel
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let c = &self.counters;
        StatsSnapshot {
            taken: c.taken.load(Ordering::Relaxed),
            discovered: c.discovered.load(Ordering::Relaxed),
            not_found: c.not_found.load(Ordering::Relaxed),
            no_record: c.no_record.load(Ordering::Relaxed),
            timed_out: c.timed_out.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
            completed_after_cancel: c.completed_after_cancel.load(Ordering::Relaxed),
        }
    }
}
