use crate::{
    core::DnsResolver,
    dns::DnsError,
};
use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake DNS resolver for testing
///
/// Names without a scripted response resolve to `NameNotFound`, the way
/// most wordlist candidates do against a real zone.
#[derive(Clone, Default)]
pub struct FakeDnsResolver {
    responses: Arc<Mutex<HashMap<String, Result<Vec<String>, DnsError>>>>,
    call_count: Arc<Mutex<HashMap<String, u32>>>,
    fallback: Option<DnsError>,
    delay: Option<Duration>,
}

impl FakeDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that answers every name with `error`.
    pub fn always(error: DnsError) -> Self {
        Self {
            fallback: Some(error),
            ..Self::default()
        }
    }

    /// Sleeps for `delay` before answering each query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Scripts a successful answer for a name
    pub fn add_success_response(&self, name: &str, records: &[&str]) {
        let records = records.iter().map(|r| r.to_string()).collect();
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_string(), Ok(records));
    }

    /// Scripts a failure for a name
    pub fn add_error_response(&self, name: &str, error: DnsError) {
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_string(), Err(error));
    }

    /// Get the number of times a name was queried
    pub fn get_call_count(&self, name: &str) -> u32 {
        let call_count = self.call_count.lock().unwrap();
        call_count.get(name).copied().unwrap_or(0)
    }

    /// Total number of queries across all names
    pub fn total_calls(&self) -> u32 {
        self.call_count.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl DnsResolver for FakeDnsResolver {
    async fn resolve(&self, name: &str, _record_type: RecordType) -> Result<Vec<String>, DnsError> {
        {
            let mut call_count = self.call_count.lock().unwrap();
            *call_count.entry(name.to_string()).or_insert(0) += 1;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(response) = self.responses.lock().unwrap().get(name) {
            return response.clone();
        }
        Err(self.fallback.clone().unwrap_or(DnsError::NameNotFound))
    }
}
