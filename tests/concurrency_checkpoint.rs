use reflective::clock::WRITE_SKEW_GRACE_NANOS;
use reflective::{AnomalyDetector, CountingStrategy};
use std::sync::Arc;
use std::thread;

const T: i64 = 1_700_000_000_000_000_000;

#[test]
fn concurrency_checkpoint_parallel_traffic_keeps_exact_totals() {
    let detector = Arc::new(AnomalyDetector::new(CountingStrategy::SimpleCount));
    let threads = 8;
    let iterations: u64 = 200;
    let stale = T - WRITE_SKEW_GRACE_NANOS - 1;

    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let detector = Arc::clone(&detector);
            thread::spawn(move || {
                let key = format!("key-{}", worker);
                for _ in 0..iterations {
                    detector.record_read_request(&key);
                    detector.record_read(&key, b"value", T);
                    assert!(detector.check_write_for_anomaly(&key, b"other", stale));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for worker in 0..threads {
        let key = format!("key-{}", worker);
        assert_eq!(detector.read_count_for_key(&key), iterations);
        assert_eq!(detector.anomaly_count_for_key(&key), iterations);
        assert_eq!(detector.anomaly_rate_for_key(&key), 100);
    }
}

#[test]
fn concurrency_checkpoint_single_observation_feeds_one_check() {
    let detector = Arc::new(AnomalyDetector::new(CountingStrategy::SimpleCount));
    detector.record_read("shared", b"value", T);
    let stale = T - WRITE_SKEW_GRACE_NANOS - 1;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let detector = Arc::clone(&detector);
            thread::spawn(move || detector.check_write_for_anomaly("shared", b"other", stale))
        })
        .collect();
    let detections = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|flagged| *flagged)
        .count();

    // The ledger hands the pending observation to exactly one checker.
    assert_eq!(detections, 1);
    assert_eq!(detector.anomaly_count_for_key("shared"), 1);
}
