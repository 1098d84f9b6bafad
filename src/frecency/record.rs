use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Daily buckets older than this many days are dropped on the next use.
pub const BUCKET_RETENTION_DAYS: u64 = 90;

/// Usage counters for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
	pub use_count: u64,
	pub last_used: DateTime<Utc>,
	/// Uses per calendar day (UTC). Analytics only; ranking ignores it.
	#[serde(default)]
	pub daily: BTreeMap<NaiveDate, u32>,
}

impl UsageRecord {
	/// A record that has never been used, stamped at `at`.
	#[must_use]
	pub fn new(at: DateTime<Utc>) -> Self {
		Self {
			use_count: 0,
			last_used: at,
			daily: BTreeMap::new(),
		}
	}

	/// Count one use at `at`.
	///
	/// `last_used` only moves forward so that out-of-order deliveries of the
	/// same use never make a prompt look older than it is.
	pub fn register(&mut self, at: DateTime<Utc>) {
		self.use_count = self.use_count.saturating_add(1);
		if at > self.last_used || self.use_count == 1 {
			self.last_used = at;
		}

		let day = at.date_naive();
		let bucket = self.daily.entry(day).or_default();
		*bucket = bucket.saturating_add(1);

		if let Some(cutoff) = day.checked_sub_days(Days::new(BUCKET_RETENTION_DAYS)) {
			self.daily.retain(|date, _| *date > cutoff);
		}
	}

	/// Uses recorded on or after `since`.
	#[must_use]
	pub fn uses_since(&self, since: NaiveDate) -> u64 {
		self.daily
			.range(since..)
			.map(|(_, count)| u64::from(*count))
			.sum()
	}
}
