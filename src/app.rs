//! The scan coordinator, decoupled from the entry point.

use crate::{
    collector::ResultCollector,
    config::Config,
    core::{DnsResolver, Output, ScanReport},
    dns::HickoryDnsResolver,
    error::Error,
    outputs::ConsoleOutput,
    queue::TaskQueue,
    shutdown::CancellationSignal,
    stats::ScanStats,
    task_manager::TaskManager,
    wordlist,
    worker::{Worker, WorkerContext},
};
use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// A fully prepared scan. Nothing has been spawned until [`App::run`].
pub struct App {
    concurrency: usize,
    supervision_interval: Duration,
    ctx: Arc<WorkerContext>,
    signal: CancellationSignal,
}

impl App {
    /// Creates a new `AppBuilder` to construct an `App`.
    pub fn builder(config: Config, domain: impl Into<String>) -> AppBuilder {
        AppBuilder::new(config, domain.into())
    }

    /// The signal raised on interruption. Cancelling it from outside has the
    /// same effect as the `interrupt` future passed to [`App::run`].
    pub fn cancellation_signal(&self) -> CancellationSignal {
        self.signal.clone()
    }

    /// Number of labels waiting in the queue.
    pub fn pending(&self) -> usize {
        self.ctx.queue.len()
    }

    /// Runs the scan until the queue is drained or `interrupt` completes.
    ///
    /// On interruption the cancellation signal is raised once and every
    /// worker is joined before the report is built; in-flight lookups are
    /// never aborted.
    #[instrument(skip_all, fields(domain = %self.ctx.domain, concurrency = self.concurrency))]
    pub async fn run<F>(self, interrupt: F) -> ScanReport
    where
        F: Future<Output = ()>,
    {
        let task_manager = TaskManager::new(self.signal.clone());
        let start = Instant::now();

        info!(
            labels = self.ctx.queue.len(),
            "Spawning {} worker tasks...", self.concurrency
        );
        for id in 0..self.concurrency {
            let worker = Worker::new(id, self.ctx.clone(), task_manager.get_shutdown_rx());
            task_manager.spawn(format!("Worker-{id}"), worker.run());
        }

        let mut interval = tokio::time::interval(self.supervision_interval);
        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    if self.signal.cancel() {
                        info!("Interrupt received, waiting for in-flight queries...");
                        self.ctx.output.interrupted();
                    }
                    break;
                }
                _ = interval.tick() => {
                    let running = task_manager.running();
                    if running == 0 {
                        break;
                    }
                    debug!(running, pending = self.ctx.queue.len(), "Supervision tick");
                }
            }
        }

        let panicked = task_manager.shutdown().await;
        let elapsed = start.elapsed();

        let report = ScanReport {
            elapsed,
            entries: self.ctx.collector.snapshot(),
            interrupted: self.signal.is_cancelled(),
            pending: self.ctx.queue.len(),
            stats: self.ctx.stats.snapshot(),
        };
        info!(
            found = report.found(),
            pending = report.pending,
            panicked,
            stats = ?report.stats,
            "Scan finished in {:.2}s", elapsed.as_secs_f64()
        );
        self.ctx.output.finished(&report);
        report
    }
}

/// Builder for a scan.
///
/// This pattern separates constructing the scan's components from running
/// it. It also provides a convenient way to override components for testing
/// purposes.
pub struct AppBuilder {
    config: Config,
    domain: String,
    labels: Option<Vec<String>>,
    wordlist: Option<PathBuf>,
    output_override: Option<Arc<dyn Output>>,
    dns_resolver_override: Option<Arc<dyn DnsResolver>>,
}

impl AppBuilder {
    /// Creates a new `AppBuilder` with the given configuration.
    pub fn new(config: Config, domain: String) -> Self {
        Self {
            config,
            domain,
            labels: None,
            wordlist: None,
            output_override: None,
            dns_resolver_override: None,
        }
    }

    /// Loads labels from a wordlist file at build time.
    pub fn wordlist(mut self, path: impl Into<PathBuf>) -> Self {
        self.wordlist = Some(path.into());
        self
    }

    /// Uses these labels instead of a wordlist file.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the console output for testing.
    pub fn output_override(mut self, output: Arc<dyn Output>) -> Self {
        self.output_override = Some(output);
        self
    }

    /// Overrides the DNS resolver for testing.
    pub fn dns_resolver_override(mut self, resolver: Arc<dyn DnsResolver>) -> Self {
        self.dns_resolver_override = Some(resolver);
        self
    }

    /// Validates the configuration, loads the labels and sets up the
    /// resolver. Every startup failure surfaces here, before any worker
    /// exists.
    #[instrument(skip_all)]
    pub fn build(self) -> Result<App, Error> {
        let config = self.config;
        config.validate()?;
        let record_type = config.record_type()?;

        let labels = match (self.labels, self.wordlist) {
            (Some(labels), _) => wordlist::normalize(labels.iter().map(String::as_str)),
            (None, Some(path)) => wordlist::load_labels(&path)?,
            (None, None) => Vec::new(),
        };
        info!(count = labels.len(), "Loaded candidate labels");

        let resolver: Arc<dyn DnsResolver> = match self.dns_resolver_override {
            Some(resolver) => resolver,
            None => {
                let (resolver, nameservers) = HickoryDnsResolver::from_config(&config.dns)?;
                let ns_str: Vec<String> = nameservers.iter().map(|s| s.to_string()).collect();
                info!("DNS Resolver: {}", ns_str.join(", "));
                Arc::new(resolver)
            }
        };
        let output: Arc<dyn Output> = match self.output_override {
            Some(output) => output,
            None => Arc::new(ConsoleOutput::new()),
        };
        debug!(output = output.name(), "Output selected");

        let ctx = Arc::new(WorkerContext {
            domain: self.domain,
            record_type,
            queue: TaskQueue::with_labels(labels),
            resolver,
            collector: ResultCollector::new(),
            output,
            stats: ScanStats::new(),
            report_timeouts: config.dns.report_timeouts,
        });

        Ok(App {
            concurrency: config.concurrency,
            supervision_interval: Duration::from_millis(config.supervision_interval_ms),
            ctx,
            signal: CancellationSignal::new(),
        })
    }
}
