//! Integration tests for cooperative cancellation of a running scan.

use anyhow::Result;
use std::{sync::Arc, time::Duration};
use subbrute::{dns::test_utils::FakeDnsResolver, shutdown::CancellationSignal};
use tokio::time::timeout;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::app::TestAppBuilder;

fn many_labels(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("label{i}")).collect()
}

/// This test verifies the core shutdown mechanism in isolation: a task
/// waiting on a subscriber terminates once the signal is raised.
#[tokio::test]
async fn test_shutdown_signal_is_propagated() -> Result<()> {
    let signal = CancellationSignal::new();
    let mut shutdown_rx = signal.subscribe();

    let worker = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => break,
                _ = tokio::time::sleep(Duration::from_millis(10)) => {}
            }
        }
    });

    assert!(signal.cancel());
    timeout(Duration::from_secs(1), worker).await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_immediate_interrupt_bounds_work_by_worker_count() {
    let concurrency = 4;
    let labels = many_labels(100);
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let resolver = Arc::new(FakeDnsResolver::new().with_delay(Duration::from_millis(50)));

    let (app, output) = TestAppBuilder::new()
        .with_labels(&label_refs)
        .with_dns_resolver(resolver.clone())
        .with_config_modifier(|c| c.concurrency = concurrency)
        .build()
        .unwrap();

    let report = timeout(Duration::from_secs(5), app.run(async {}))
        .await
        .expect("shutdown must not hang");

    assert!(report.interrupted);
    assert_eq!(output.interrupted_count(), 1);
    assert!(resolver.total_calls() as usize <= concurrency);
    assert!(report.stats.completed_after_cancel <= concurrency);
    assert_eq!(report.pending + report.stats.taken, labels.len());
    assert!(output.finished_report().is_some_and(|r| r.interrupted));
}

#[tokio::test]
async fn test_in_flight_query_completes_after_interrupt() {
    let resolver = Arc::new(FakeDnsResolver::new().with_delay(Duration::from_millis(150)));
    resolver.add_success_response("www.example.com", &["93.184.216.34"]);
    resolver.add_success_response("mail.example.com", &["93.184.216.40"]);

    let (app, output) = TestAppBuilder::new()
        .with_labels(&["www", "mail"])
        .with_dns_resolver(resolver.clone())
        .with_config_modifier(|c| c.concurrency = 1)
        .build()
        .unwrap();

    let interrupt = tokio::time::sleep(Duration::from_millis(30));
    let report = app.run(interrupt).await;

    // "www" was in flight and is kept; "mail" was never taken.
    assert!(report.interrupted);
    assert_eq!(output.discovered_names(), vec!["www.example.com"]);
    assert_eq!(report.pending, 1);
    assert_eq!(report.stats.completed_after_cancel, 1);
    assert_eq!(resolver.get_call_count("mail.example.com"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mid_scan_interrupt_stops_taking_new_work() {
    let concurrency = 2;
    let labels = many_labels(200);
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let resolver = Arc::new(FakeDnsResolver::new().with_delay(Duration::from_millis(20)));

    let (app, output) = TestAppBuilder::new()
        .with_labels(&label_refs)
        .with_dns_resolver(resolver.clone())
        .with_config_modifier(|c| c.concurrency = concurrency)
        .build()
        .unwrap();

    let report = app.run(tokio::time::sleep(Duration::from_millis(100))).await;

    assert!(report.interrupted);
    assert!(report.pending > 0);
    assert_eq!(resolver.total_calls() as usize, report.stats.taken);
    assert!(report.stats.completed_after_cancel <= concurrency);
    assert_eq!(output.interrupted_count(), 1);
}

#[tokio::test]
async fn test_pre_cancelled_scan_takes_nothing() {
    let resolver = Arc::new(FakeDnsResolver::new());
    let (app, output) = TestAppBuilder::new()
        .with_labels(&["www", "mail"])
        .with_dns_resolver(resolver.clone())
        .build()
        .unwrap();

    app.cancellation_signal().cancel();
    let report = timeout(Duration::from_secs(2), app.run(std::future::pending()))
        .await
        .expect("scan should stop");

    assert!(report.interrupted);
    assert_eq!(resolver.total_calls(), 0);
    assert_eq!(report.pending, 2);
    // The notification belongs to the interrupt path only.
    assert_eq!(output.interrupted_count(), 0);
}
