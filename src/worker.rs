//! The per-task loop run by each member of the worker pool.
use crate::{
    collector::ResultCollector,
    core::{DiscoveredEntry, DnsResolver, Output},
    dns::DnsError,
    queue::TaskQueue,
    stats::ScanStats,
};
use hickory_resolver::proto::rr::RecordType;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// Everything a worker shares with its siblings. Built once by the
/// coordinator before the first worker is spawned.
pub struct WorkerContext {
    pub domain: String,
    pub record_type: RecordType,
    pub queue: TaskQueue,
    pub resolver: Arc<dyn DnsResolver>,
    pub collector: ResultCollector,
    pub output: Arc<dyn Output>,
    pub stats: ScanStats,
    /// Pass timeouts on to the output instead of only logging them.
    pub report_timeouts: bool,
}

/// Builds the fully-qualified name for a wordlist label.
pub fn candidate_name(label: &str, domain: &str) -> String {
    format!("{label}.{domain}")
}

pub struct Worker {
    id: usize,
    ctx: Arc<WorkerContext>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Worker {
    pub fn new(id: usize, ctx: Arc<WorkerContext>, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            id,
            ctx,
            shutdown_rx,
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Drains the queue until it is empty or cancellation is observed.
    ///
    /// Cancellation is only checked between tasks; a lookup that is already
    /// in flight always runs to completion or timeout.
    pub async fn run(self) {
        debug!(worker_id = self.id, "Worker started");
        loop {
            if self.is_cancelled() {
                debug!(worker_id = self.id, "Worker observed cancellation, stopping.");
                break;
            }
            let Some(label) = self.ctx.queue.try_take() else {
                debug!(worker_id = self.id, "Queue drained, worker stopping.");
                break;
            };
            self.ctx.stats.record_taken();

            let name = candidate_name(&label, &self.ctx.domain);
            let outcome = self.ctx.resolver.resolve(&name, self.ctx.record_type).await;
            let label = match &outcome {
                Ok(_) => "success",
                Err(e) => e.outcome_label(),
            };
            metrics::counter!("dns_queries_total", "outcome" => label).increment(1);
            self.ctx.stats.record_outcome(&outcome);
            if self.is_cancelled() {
                self.ctx.stats.record_after_cancel();
            }
            self.handle_outcome(name, outcome);
        }
    }

    fn handle_outcome(&self, name: String, outcome: Result<Vec<String>, DnsError>) {
        match outcome {
            Ok(records) => {
                let entry = DiscoveredEntry::new(name, records);
                if self.ctx.collector.append(entry.clone()) {
                    self.ctx.output.discovered(&entry);
                } else {
                    debug!(worker_id = self.id, name = %entry.name, "Duplicate entry ignored");
                }
            }
            Err(DnsError::TimedOut) => {
                if self.ctx.report_timeouts {
                    self.ctx.output.timed_out(&name);
                } else {
                    debug!(worker_id = self.id, %name, "Lookup timed out");
                }
            }
            Err(e) if e.is_expected() => {
                trace!(worker_id = self.id, %name, reason = %e, "Candidate does not resolve");
            }
            Err(e) => {
                debug!(worker_id = self.id, %name, error = %e, "Lookup failed");
            }
        }
    }
}
