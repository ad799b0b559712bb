//! Per-key counter registries with a construction-time counting strategy.

use crate::config::CountingStrategy;
use crate::counter::KeyCounter;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps each key to one counter of the configured variant.
///
/// Counters are created lazily on the first event for a key and are never
/// evicted; registries grow with observed key cardinality for the life of
/// the process.
#[derive(Debug)]
pub struct CounterRegistry {
    strategy: CountingStrategy,
    counters: Mutex<HashMap<String, KeyCounter>>,
}

impl CounterRegistry {
    pub fn new(strategy: CountingStrategy) -> Self {
        Self {
            strategy,
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn strategy(&self) -> CountingStrategy {
        self.strategy
    }

    /// Records one event for `key` at wall-clock second `now_secs`,
    /// creating the counter if this is the key's first event.
    pub fn record(&self, key: &str, now_secs: i64) {
        let mut counters = self.counters.lock();
        counters
            .entry(key.to_string())
            .or_insert_with(|| KeyCounter::for_strategy(self.strategy))
            .record(now_secs);
    }

    /// Current total for `key`, 0 if the key has never seen an event.
    pub fn total_for_key(&self, key: &str) -> u64 {
        self.counters
            .lock()
            .get(key)
            .map(KeyCounter::total)
            .unwrap_or(0)
    }

    /// Point-in-time totals for every tracked key.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let counters = self.counters.lock();
        RegistrySnapshot {
            totals: counters
                .iter()
                .map(|(key, counter)| (key.clone(), counter.total()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub totals: HashMap<String, u64>,
}
