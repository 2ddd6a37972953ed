//! Integration tests for DNS failure handling.

use hickory_resolver::proto::rr::RecordType;
use std::{sync::Arc, time::Duration};
use subbrute::{
    config::DnsConfig,
    dns::{test_utils::FakeDnsResolver, DnsError, DnsResolver, HickoryDnsResolver},
};

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::{app::TestAppBuilder, test_metrics::TestMetrics};

/// A single-threaded runtime, so spawned workers see a thread-local recorder.
fn current_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_expected_absences_are_skipped_silently() {
    let fake_resolver = Arc::new(FakeDnsResolver::new());
    fake_resolver.add_success_response("www.example.com", &["93.184.216.34"]);
    fake_resolver.add_error_response("mx-only.example.com", DnsError::NoMatchingRecord);

    let (app, output) = TestAppBuilder::new()
        .with_labels(&["www", "mx-only", "ghost"])
        .with_dns_resolver(fake_resolver.clone())
        .build()
        .unwrap();

    let report = app.run(std::future::pending()).await;

    assert_eq!(output.discovered_names(), vec!["www.example.com"]);
    assert_eq!(output.timeout_count(), 0);
    assert_eq!(report.stats.no_record, 1);
    assert_eq!(report.stats.not_found, 1);
    // No failure is ever retried.
    assert_eq!(fake_resolver.get_call_count("mx-only.example.com"), 1);
    assert_eq!(fake_resolver.get_call_count("ghost.example.com"), 1);
}

#[tokio::test]
async fn test_timeouts_are_silent_by_default() {
    let fake_resolver = Arc::new(FakeDnsResolver::always(DnsError::TimedOut));

    let (app, output) = TestAppBuilder::new()
        .with_labels(&["a", "b", "c"])
        .with_dns_resolver(fake_resolver)
        .build()
        .unwrap();

    let report = app.run(std::future::pending()).await;

    assert_eq!(report.found(), 0);
    assert_eq!(report.stats.timed_out, 3);
    assert_eq!(output.timeout_count(), 0);
}

#[tokio::test]
async fn test_timeouts_reported_in_verbose_mode() {
    let fake_resolver = Arc::new(FakeDnsResolver::always(DnsError::TimedOut));

    let (app, output) = TestAppBuilder::new()
        .with_labels(&["a", "b"])
        .with_dns_resolver(fake_resolver)
        .with_config_modifier(|c| c.dns.report_timeouts = true)
        .build()
        .unwrap();

    app.run(std::future::pending()).await;

    let mut timeouts = output.timeouts.lock().unwrap().clone();
    timeouts.sort();
    assert_eq!(timeouts, vec!["a.example.com", "b.example.com"]);
}

#[tokio::test]
async fn test_other_failures_never_stop_the_pool() {
    let fake_resolver = Arc::new(FakeDnsResolver::new());
    fake_resolver.add_error_response("broken.example.com", DnsError::Other("SERVFAIL".into()));
    fake_resolver.add_success_response("after.example.com", &["10.1.1.1"]);

    let (app, output) = TestAppBuilder::new()
        .with_labels(&["broken", "after"])
        .with_dns_resolver(fake_resolver)
        .with_config_modifier(|c| c.concurrency = 1)
        .build()
        .unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), app.run(std::future::pending()))
        .await
        .expect("scan should finish");

    assert_eq!(report.stats.failed, 1);
    assert_eq!(output.discovered_names(), vec!["after.example.com"]);
    assert_eq!(output.timeout_count(), 0);
}

#[test]
fn test_lookup_outcomes_are_counted_by_label() {
    let metrics = TestMetrics::new();
    let fake_resolver = Arc::new(FakeDnsResolver::new());
    fake_resolver.add_success_response("www.example.com", &["93.184.216.34"]);
    fake_resolver.add_error_response("mx-only.example.com", DnsError::NoMatchingRecord);
    fake_resolver.add_error_response("slow.example.com", DnsError::TimedOut);
    fake_resolver.add_error_response("broken.example.com", DnsError::Other("REFUSED".into()));

    let (app, _output) = TestAppBuilder::new()
        .with_labels(&["www", "mx-only", "ghost", "slow", "broken"])
        .with_dns_resolver(fake_resolver)
        .build()
        .unwrap();

    let rt = current_thread_runtime();
    let report =
        metrics::with_local_recorder(&metrics, || rt.block_on(app.run(std::future::pending())));

    assert_eq!(report.found(), 1);
    assert_eq!(metrics.get_counter("dns_queries_total{outcome=success}"), 1);
    assert_eq!(metrics.get_counter("dns_queries_total{outcome=no_record}"), 1);
    assert_eq!(metrics.get_counter("dns_queries_total{outcome=nxdomain}"), 1);
    assert_eq!(metrics.get_counter("dns_queries_total{outcome=timeout}"), 1);
    assert_eq!(metrics.get_counter("dns_queries_total{outcome=failure}"), 1);
    assert_eq!(metrics.counter_total("dns_queries_total"), 5);
}

#[test]
fn test_resolution_duration_recorded_even_on_timeout() {
    let metrics = TestMetrics::new();
    let rt = current_thread_runtime();

    let result = metrics::with_local_recorder(&metrics, || {
        rt.block_on(async {
            // Bound but never answered.
            let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let config = DnsConfig {
                timeout_ms: 200,
                nameservers: vec![silent.local_addr().unwrap().to_string()],
                report_timeouts: false,
            };
            let (resolver, _) = HickoryDnsResolver::from_config(&config).unwrap();
            resolver.resolve("www.example.com", RecordType::A).await
        })
    });

    assert_eq!(result, Err(DnsError::TimedOut));
    assert_eq!(metrics.histogram_samples("dns_resolution_duration_seconds"), 1);
}
