//! Write-time anomaly evaluation against recorded reads.

use crate::clock;
use crate::config::{ConfigError, CountingStrategy};
use crate::ledger::ReadLedger;
use crate::registry::{CounterRegistry, RegistrySnapshot};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Detects read/write consistency anomalies for a key-value access layer.
///
/// Callers report the reads they perform and the writes they issue; the
/// detector flags a write as anomalous when it carries a timestamp earlier
/// than an already-observed read of the same key (beyond the clock-skew
/// grace in [`clock::WRITE_SKEW_GRACE_NANOS`]) yet a different value: the
/// read returned something no causally-earlier write produced.
///
/// The detector is an owned object: construct one at startup and share it
/// by reference. Every method may be called concurrently from any number of
/// threads; the ledger and the two registries each take their own lock, one
/// at a time, for O(1) critical sections.
#[derive(Debug)]
pub struct AnomalyDetector {
    ledger: ReadLedger,
    anomalies: CounterRegistry,
    read_requests: CounterRegistry,
}

impl AnomalyDetector {
    /// Builds a detector whose registries count with `strategy`.
    pub fn new(strategy: CountingStrategy) -> Self {
        info!("anomaly detector initialized, counting strategy {}", strategy);
        Self {
            ledger: ReadLedger::new(),
            anomalies: CounterRegistry::new(strategy),
            read_requests: CounterRegistry::new(strategy),
        }
    }

    /// Builds a detector from the startup configuration selector. Exactly
    /// two selectors are recognized, `"simple-count"` and
    /// `"decaying-window"`; anything else is a configuration error.
    pub fn from_strategy_selector(selector: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(selector.parse()?))
    }

    pub fn strategy(&self) -> CountingStrategy {
        self.anomalies.strategy()
    }

    /// Records that a read of `key` returned `value` at `when_nanos`,
    /// replacing any pending observation for the key.
    pub fn record_read(&self, key: &str, value: &[u8], when_nanos: i64) {
        self.ledger.record(key, value, when_nanos);
    }

    /// [`record_read`](Self::record_read) stamped with the current wall clock.
    pub fn record_read_now(&self, key: &str, value: &[u8]) {
        self.record_read(key, value, clock::now_unix_nanos());
    }

    /// Counts a read *request* for `key`. Independent of [`record_read`]:
    /// many requests may be counted while only the latest observation is
    /// retained for checking.
    ///
    /// [`record_read`]: Self::record_read
    pub fn record_read_request(&self, key: &str) {
        self.read_requests.record(key, clock::now_unix_secs());
    }

    /// Checks a write of `value` to `key` at `when_nanos` against the
    /// pending read observation, if any.
    ///
    /// The pending observation is consumed whether or not the write is
    /// anomalous; each observation is compared against at most one write.
    /// The write is anomalous when its timestamp precedes the read's by
    /// more than the skew grace and its value differs from what the read
    /// returned. Detected anomalies are counted per key.
    pub fn check_write_for_anomaly(&self, key: &str, value: &[u8], when_nanos: i64) -> bool {
        let Some(record) = self.ledger.consume(key) else {
            debug!("write check for key {:?} found no pending read", key);
            return false;
        };
        if record.observed_at_nanos - clock::WRITE_SKEW_GRACE_NANOS > when_nanos
            && record.value_observed != value
        {
            self.anomalies.record(key, clock::now_unix_secs());
            warn!(
                "consistency anomaly on key {:?}: write at {} predates read at {} with a different value",
                key, when_nanos, record.observed_at_nanos
            );
            return true;
        }
        false
    }

    /// [`check_write_for_anomaly`](Self::check_write_for_anomaly) stamped
    /// with the current wall clock.
    pub fn check_write_for_anomaly_now(&self, key: &str, value: &[u8]) -> bool {
        self.check_write_for_anomaly(key, value, clock::now_unix_nanos())
    }

    /// Anomalies detected for `key`, per the configured counting strategy.
    pub fn anomaly_count_for_key(&self, key: &str) -> u64 {
        self.anomalies.total_for_key(key)
    }

    /// Read requests counted for `key`, per the configured counting strategy.
    pub fn read_count_for_key(&self, key: &str) -> u64 {
        self.read_requests.total_for_key(key)
    }

    /// Anomalies as a truncated percentage of read requests, in `[0, 100]`.
    ///
    /// Returns 0 when either counter is 0. The two counters accumulate
    /// independently; under the decaying-window strategy they are not
    /// time-aligned, so the rate is an approximation, clamped in case
    /// anomaly decay lags read decay.
    pub fn anomaly_rate_for_key(&self, key: &str) -> u64 {
        let total_reads = self.read_count_for_key(key);
        if total_reads == 0 {
            return 0;
        }
        let anomaly_count = self.anomaly_count_for_key(key);
        if anomaly_count == 0 {
            return 0;
        }
        (anomaly_count.saturating_mul(100) / total_reads).min(100)
    }

    /// Point-in-time per-key totals for both registries, plus the number of
    /// reads still awaiting a write check.
    pub fn snapshot(&self) -> DetectorSnapshot {
        DetectorSnapshot {
            strategy: self.strategy(),
            anomalies: self.anomalies.snapshot(),
            read_requests: self.read_requests.snapshot(),
            pending_reads: self.ledger.pending(),
        }
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(CountingStrategy::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorSnapshot {
    pub strategy: CountingStrategy,
    pub anomalies: RegistrySnapshot,
    pub read_requests: RegistrySnapshot,
    pub pending_reads: usize,
}
