//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. Optional arguments are merged over the configuration file and
//! environment variables; the target domain and wordlist only come from here.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Concurrent DNS subdomain enumeration from a wordlist.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target domain, e.g. example.com
    #[arg(short, long, value_parser = parse_domain)]
    pub domain: String,

    /// Path to a newline-separated list of candidate labels
    #[arg(short, long, value_name = "FILE")]
    pub wordlist: PathBuf,

    /// Number of concurrent workers [default: 20]
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub threads: Option<NonZeroUsize>,

    /// DNS record type to query, e.g. A, AAAA, MX [default: A]
    #[arg(short = 'r', long = "record", value_name = "TYPE", value_parser = parse_record_type)]
    pub record_type: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Timeout for a single DNS lookup in milliseconds.
    #[arg(long, value_name = "MS")]
    pub dns_timeout_ms: Option<u64>,

    /// Nameserver to query; repeat to use several. Replaces the defaults.
    #[arg(long = "nameserver", value_name = "ADDR")]
    pub nameservers: Vec<String>,

    /// Print a line for every candidate whose lookup timed out.
    #[arg(long)]
    pub verbose_timeouts: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

fn parse_domain(input: &str) -> Result<String, String> {
    let domain = input.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err("domain must not be empty".to_string());
    }
    Ok(domain.to_string())
}

fn parse_record_type(input: &str) -> Result<String, String> {
    crate::config::parse_record_type(input)
        .map(|rt| rt.to_string())
        .map_err(|e| e.to_string())
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(threads) = self.threads {
            dict.insert("concurrency".into(), Value::from(threads.get()));
        }
        if let Some(record_type) = &self.record_type {
            dict.insert("record_type".into(), Value::from(record_type.clone()));
        }
        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut dns = Dict::new();
        if let Some(timeout) = self.dns_timeout_ms {
            dns.insert("timeout_ms".into(), Value::from(timeout));
        }
        if !self.nameservers.is_empty() {
            dns.insert("nameservers".into(), Value::from(self.nameservers.clone()));
        }
        // Only an explicit flag overrides; absence keeps the lower layers.
        if self.verbose_timeouts {
            dns.insert("report_timeouts".into(), Value::from(true));
        }
        if !dns.is_empty() {
            dict.insert("dns".into(), Value::from(dns));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
