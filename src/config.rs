//! Configuration management for subbrute
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! `SUBBRUTE_` environment variables and command-line arguments, in that
//! order of increasing precedence.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use hickory_resolver::proto::rr::RecordType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{cli::Cli, dns::parse_nameserver, error::Error};

/// Record types a scan may request.
pub const SUPPORTED_RECORD_TYPES: &[RecordType] = &[
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::MX,
    RecordType::NS,
    RecordType::TXT,
    RecordType::SOA,
    RecordType::SRV,
    RecordType::CAA,
    RecordType::PTR,
];

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Number of concurrent workers.
    pub concurrency: usize,
    /// DNS record type to request for every candidate.
    pub record_type: String,
    /// How often the coordinator polls worker liveness.
    pub supervision_interval_ms: u64,
    /// Configuration for DNS resolution.
    pub dns: DnsConfig,
}

/// Configuration for DNS resolution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DnsConfig {
    /// Upper bound on a single lookup, in milliseconds.
    pub timeout_ms: u64,
    /// Nameservers in preference order. Empty means the system configuration.
    pub nameservers: Vec<String>,
    /// Print a line for every timed-out candidate.
    #[serde(default)]
    pub report_timeouts: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            nameservers: vec![
                "8.8.8.8:53".to_string(),
                "1.1.1.1:53".to_string(),
                "9.9.9.9:53".to_string(),
            ],
            report_timeouts: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            concurrency: 20,
            record_type: "A".to_string(),
            supervision_interval_ms: 100,
            dns: DnsConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration by layering sources: defaults, file,
    /// environment, and CLI args.
    pub fn load(cli: &Cli) -> Result<Self, Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(Error::InvalidConfig(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. SUBBRUTE_CONCURRENCY=50 or SUBBRUTE_DNS__TIMEOUT_MS=500
            .merge(Env::prefixed("SUBBRUTE_").split("__"))
            .merge(cli.clone())
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot run a scan.
    pub fn validate(&self) -> Result<(), Error> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.supervision_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "supervision_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.dns.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "dns.timeout_ms must be greater than 0".to_string(),
            ));
        }
        for addr in &self.dns.nameservers {
            parse_nameserver(addr)?;
        }
        self.record_type()?;
        Ok(())
    }

    /// The configured record type, matched case-insensitively.
    pub fn record_type(&self) -> Result<RecordType, Error> {
        parse_record_type(&self.record_type)
    }
}

/// Parses a record type name such as `a` or `AAAA`.
pub fn parse_record_type(input: &str) -> Result<RecordType, Error> {
    let unsupported = || Error::UnsupportedRecordType(input.to_string());
    let record_type =
        RecordType::from_str(&input.trim().to_uppercase()).map_err(|_| unsupported())?;
    if SUPPORTED_RECORD_TYPES.contains(&record_type) {
        Ok(record_type)
    } else {
        Err(unsupported())
    }
}
