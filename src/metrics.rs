//! Call counters for provider operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::YogiError;

/// Counter map incremented on every provider call, with success and failure
/// tracked under separate names.
///
/// Cheap to clone — clones share the underlying map. Counters are never
/// reset; [`MetricsSink::snapshot`] returns a point-in-time copy.
#[derive(Clone, Default)]
pub struct MetricsSink {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `counter`, creating it first if needed.
    pub fn incr(&self, counter: impl Into<String>) -> Result<(), YogiError> {
        let mut counters = self.lock()?;
        *counters.entry(counter.into()).or_insert(0) += 1;
        Ok(())
    }

    /// Current value of a single counter; zero when it was never incremented.
    pub fn get(&self, counter: &str) -> Result<u64, YogiError> {
        Ok(self.lock()?.get(counter).copied().unwrap_or(0))
    }

    /// Snapshot of all counters.
    pub fn snapshot(&self) -> Result<HashMap<String, u64>, YogiError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, u64>>, YogiError> {
        self.counters
            .lock()
            .map_err(|e| YogiError::Internal(format!("metrics lock poisoned: {e}")))
    }
}
