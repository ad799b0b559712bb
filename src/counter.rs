//! Per-key event counters behind the two counting strategies.

use crate::config::CountingStrategy;

const WINDOW_BUCKETS: usize = 5;

/// Event counter over the trailing five seconds.
///
/// Events land in one of five one-second buckets indexed by `t mod 5`.
/// Buckets whose second has aged out of the window are zeroed lazily on the
/// next [`record`](WindowedCounter::record); [`total`](WindowedCounter::total)
/// sums all buckets unconditionally. A total queried long after the last
/// record therefore still reports the pre-expiry sum until another record
/// lands. That approximation is part of the contract; callers must not
/// rely on reads decaying the window.
#[derive(Debug, Clone, Default)]
pub struct WindowedCounter {
    buckets: [u64; WINDOW_BUCKETS],
    last_update_secs: i64,
}

impl WindowedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one event at wall-clock second `now_secs`.
    pub fn record(&mut self, now_secs: i64) {
        let slot = now_secs.rem_euclid(WINDOW_BUCKETS as i64) as usize;
        let elapsed = (now_secs - self.last_update_secs).min(WINDOW_BUCKETS as i64);
        for offset in 0..elapsed.max(0) as usize {
            self.buckets[(slot + offset) % WINDOW_BUCKETS] = 0;
        }
        self.buckets[slot] = self.buckets[slot].saturating_add(1);
        self.last_update_secs = now_secs;
    }

    /// Sum of all buckets, stale or not.
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }
}

/// A per-key counter of the variant the configured strategy calls for.
/// The set is closed: registries pick the variant once at construction and
/// every key in a registry counts the same way.
#[derive(Debug, Clone)]
pub enum KeyCounter {
    /// Monotonic count, never decays.
    Simple(u64),
    /// Approximate count over the trailing five seconds.
    Windowed(WindowedCounter),
}

impl KeyCounter {
    pub fn for_strategy(strategy: CountingStrategy) -> Self {
        match strategy {
            CountingStrategy::SimpleCount => KeyCounter::Simple(0),
            CountingStrategy::DecayingWindow => KeyCounter::Windowed(WindowedCounter::new()),
        }
    }

    pub fn record(&mut self, now_secs: i64) {
        match self {
            KeyCounter::Simple(count) => *count = count.saturating_add(1),
            KeyCounter::Windowed(window) => window.record(now_secs),
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            KeyCounter::Simple(count) => *count,
            KeyCounter::Windowed(window) => window.total(),
        }
    }
}
