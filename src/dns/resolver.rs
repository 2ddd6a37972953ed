use crate::{config::DnsConfig, core::DnsResolver, dns::DnsError, error::Error};
use async_trait::async_trait;
use hickory_resolver::{
    config::{NameServerConfig, ResolverConfig, ResolverOpts},
    proto::{op::ResponseCode, rr::RecordType, xfer::Protocol, ProtoErrorKind},
    system_conf, ResolveError, ResolveErrorKind, TokioResolver,
};
use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};
use tracing::{trace, warn};

/// Resolver adapter backed by hickory-resolver.
///
/// The configuration is fixed at construction and shared read-only by every
/// worker.
pub struct HickoryDnsResolver {
    resolver: TokioResolver,
    timeout: Duration,
}

impl HickoryDnsResolver {
    /// Creates a resolver from the DNS section of the application config.
    ///
    /// Returns the resolver together with the nameservers it will use.
    pub fn from_config(config: &DnsConfig) -> Result<(Self, Vec<SocketAddr>), Error> {
        let resolver_config = if config.nameservers.is_empty() {
            let (system_config, _) = system_conf::read_system_conf()
                .map_err(|e| Error::ResolverSetup(e.to_string()))?;
            if system_config.name_servers().is_empty() {
                warn!("No system DNS servers found, falling back to Cloudflare DNS.");
                ResolverConfig::cloudflare()
            } else {
                system_config
            }
        } else {
            let mut custom_config = ResolverConfig::new();
            for addr in &config.nameservers {
                let socket_addr = parse_nameserver(addr)?;
                custom_config.add_name_server(NameServerConfig::new(socket_addr, Protocol::Udp));
            }
            custom_config
        };

        // Rebuild without search domains so candidates are always absolute.
        let mut resolver_config_with_no_search = ResolverConfig::new();
        for ns in resolver_config.name_servers() {
            resolver_config_with_no_search.add_name_server(ns.clone());
        }

        let mut nameservers: Vec<_> = resolver_config_with_no_search
            .name_servers()
            .iter()
            .map(|ns| ns.socket_addr)
            .collect();
        nameservers.dedup();

        let timeout = Duration::from_millis(config.timeout_ms);
        let mut resolver_opts = ResolverOpts::default();
        resolver_opts.ndots = 1;
        resolver_opts.timeout = timeout;
        // A failed candidate is final; never retry inside one call.
        resolver_opts.attempts = 0;
        // Every lookup goes to the network.
        resolver_opts.cache_size = 0;

        let resolver = hickory_resolver::Resolver::builder_with_config(
            resolver_config_with_no_search,
            hickory_resolver::name_server::TokioConnectionProvider::default(),
        )
        .with_options(resolver_opts)
        .build();

        Ok((Self { resolver, timeout }, nameservers))
    }
}

#[async_trait]
impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, DnsError> {
        let start_time = Instant::now();

        // The outer timeout bounds the whole call, not just one exchange.
        let lookup = self.resolver.lookup(name, record_type);
        let result = tokio::time::timeout(self.timeout, lookup).await;
        metrics::histogram!("dns_resolution_duration_seconds")
            .record(start_time.elapsed().as_secs_f64());

        let lookup = match result {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                let error = classify(&e);
                trace!(name, error = %e, elapsed = ?start_time.elapsed(), "Lookup failed");
                return Err(error);
            }
            Err(_) => {
                trace!(name, elapsed = ?start_time.elapsed(), "Lookup exceeded timeout");
                return Err(DnsError::TimedOut);
            }
        };

        // Answers can carry CNAME links ahead of the requested records.
        let records: Vec<String> = lookup
            .record_iter()
            .filter(|record| record.record_type() == record_type)
            .map(|record| record.data().to_string())
            .collect();

        if records.is_empty() {
            return Err(DnsError::NoMatchingRecord);
        }
        Ok(records)
    }
}

/// Maps a hickory error onto the worker's failure classes.
///
/// An empty answer only counts as an expected absence when the server
/// answered NXDOMAIN or NOERROR; SERVFAIL, REFUSED and the like are failures.
fn classify(err: &ResolveError) -> DnsError {
    match err.kind() {
        ResolveErrorKind::Proto(proto) => match proto.kind() {
            ProtoErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
                ResponseCode::NXDomain => DnsError::NameNotFound,
                ResponseCode::NoError => DnsError::NoMatchingRecord,
                code => DnsError::Other(format!("server responded {code}")),
            },
            ProtoErrorKind::Timeout => DnsError::TimedOut,
            _ if mentions_timeout(err) => DnsError::TimedOut,
            _ => DnsError::Other(err.to_string()),
        },
        _ if mentions_timeout(err) => DnsError::TimedOut,
        _ => DnsError::Other(err.to_string()),
    }
}

fn mentions_timeout(err: &ResolveError) -> bool {
    err.to_string().to_lowercase().contains("timed out")
}

/// Parses a nameserver address into a socket address.
///
/// Supports formats:
///   "1.1.1.1"              -- IPv4, default port 53
///   "1.1.1.1:53"           -- IPv4 with explicit port
///   "2606:4700::1111"      -- bare IPv6, default port 53
///   "[2606:4700::1111]:53" -- bracketed IPv6 with port
pub fn parse_nameserver(input: &str) -> Result<SocketAddr, Error> {
    let trimmed = input.trim();
    let invalid = |reason: String| Error::InvalidNameserver {
        addr: input.to_string(),
        reason,
    };
    if trimmed.is_empty() {
        return Err(invalid("empty address".to_string()));
    }

    if trimmed.starts_with('[') {
        return trimmed.parse().map_err(|e| invalid(format!("{e}")));
    }
    if trimmed.matches(':').count() > 1 {
        let ip = trimmed.parse().map_err(|e| invalid(format!("{e}")))?;
        return Ok(SocketAddr::new(ip, 53));
    }
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let ip = trimmed.parse().map_err(|e| invalid(format!("{e}")))?;
    Ok(SocketAddr::new(ip, 53))
}
