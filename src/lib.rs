/// subbrute - concurrent DNS subdomain enumeration
///
/// This library provides the worker pool, resolver adapter and coordinator
/// that turn a wordlist into the set of resolving subdomains of a target.
pub mod app;
pub mod cli;
pub mod collector;
pub mod config;
pub mod core;
pub mod dns;
pub mod error;
pub mod outputs;
pub mod queue;
pub mod shutdown;
pub mod stats;
pub mod task_manager;
pub mod wordlist;
pub mod worker;

// Re-export core types for convenience
pub use crate::core::*;
pub use crate::error::Error;
