//! Centralized wall-clock policy for the detector.
//!
//! Keeping the skew tolerance and the time accessors in one place makes it
//! clear which parts of the system share a time base and gives us a single
//! knob to turn if the tolerance needs to change.

use std::time::{SystemTime, UNIX_EPOCH};

/// Clock-skew tolerance between the machine that recorded a read and the
/// machine that recorded the write being checked. A write this much earlier
/// than the read is still treated as concurrent with it. The 35 ms figure
/// comes from the existential consistency measurement study.
pub const WRITE_SKEW_GRACE_NANOS: i64 = 35_000_000;

/// Current wall-clock time in nanoseconds since the Unix epoch.
pub fn now_unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or(0)
}

/// Current wall-clock time in whole seconds since the Unix epoch. Second
/// granularity is all the windowed counters need.
pub fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_and_nano_clocks_agree() {
        let secs = now_unix_secs();
        let nanos = now_unix_nanos();
        let nanos_as_secs = nanos / 1_000_000_000;
        assert!((nanos_as_secs - secs).abs() <= 1);
    }
}
