use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a scan before any worker is spawned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("wordlist not found at '{}'", path.display())]
    WordlistNotFound { path: PathBuf },

    #[error("failed to read wordlist '{}': {source}", path.display())]
    WordlistUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported DNS record type '{0}'")]
    UnsupportedRecordType(String),

    #[error("invalid nameserver address '{addr}': {reason}")]
    InvalidNameserver { addr: String, reason: String },

    #[error("failed to set up DNS resolver: {0}")]
    ResolverSetup(String),
}

impl Error {
    /// Process exit code for this error: 1 for wordlist and resolver
    /// failures, 2 for malformed arguments or configuration.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::WordlistNotFound { .. }
            | Error::WordlistUnreadable { .. }
            | Error::ResolverSetup(_) => 1,
            Error::Config(_)
            | Error::InvalidConfig(_)
            | Error::UnsupportedRecordType(_)
            | Error::InvalidNameserver { .. } => 2,
        }
    }
}
