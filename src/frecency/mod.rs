//! Usage counters and the frecency signal derived from them.

mod record;
mod store;
mod tracker;

pub use record::{BUCKET_RETENTION_DAYS, UsageRecord};
pub use store::{JsonUsageStore, MemoryUsageStore, UsageStore};
pub use tracker::{FrecencyParams, FrecencySnapshot, FrecencyTracker};
