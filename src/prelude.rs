//! Convenience re-exports for downstream crates. Pull this module in via
//! `use reflective::prelude::*;` when you want the most common types without
//! spelunking the module tree.

pub use crate::config::{ConfigError, CountingStrategy};
pub use crate::detector::{AnomalyDetector, DetectorSnapshot};
pub use crate::ledger::ReadRecord;
