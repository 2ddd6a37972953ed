//! Thread-safe accumulator for discovered entries.
use crate::core::DiscoveredEntry;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<DiscoveredEntry>,
    names: HashSet<String>,
}

/// Collects entries appended by any number of workers.
///
/// Clones share the same storage. Entries keep completion order, and a name
/// is stored at most once.
#[derive(Clone, Debug, Default)]
pub struct ResultCollector {
    inner: Arc<Mutex<Inner>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry`. Returns `false` if its name was already collected.
    pub fn append(&self, entry: DiscoveredEntry) -> bool {
        let mut inner = self.lock();
        if !inner.names.insert(entry.name.clone()) {
            return false;
        }
        inner.entries.push(entry);
        true
    }

    /// A copy of everything collected so far.
    pub fn snapshot(&self) -> Vec<DiscoveredEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Appends are all-or-nothing, so a poisoned lock still guards consistent data.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
