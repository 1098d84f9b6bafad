use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::record::UsageRecord;
use super::store::UsageStore;
use crate::error::UsageRecordError;
use crate::types::PromptId;

/// Constants of the frecency formula.
///
/// The score of a prompt used `n` times, last `h` hours ago, is
///
/// ```text
/// frequency = 1 - exp(-n / saturation_uses)
/// recency   = 0.5 ^ (h / half_life_hours)
/// score     = frequency * (recency_floor + (1 - recency_floor) * recency)
/// ```
///
/// which stays within `[0, 1]` and is `0` for unused prompts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrecencyParams {
	pub half_life_hours: f64,
	pub saturation_uses: f64,
	pub recency_floor: f64,
}

impl Default for FrecencyParams {
	fn default() -> Self {
		Self {
			half_life_hours: 168.0,
			saturation_uses: 10.0,
			recency_floor: 0.1,
		}
	}
}

impl FrecencyParams {
	/// Score one usage record as of `now`.
	#[must_use]
	pub fn score(&self, record: &UsageRecord, now: DateTime<Utc>) -> f64 {
		if record.use_count == 0 {
			return 0.0;
		}
		let age_hours = (now - record.last_used).num_seconds().max(0) as f64 / 3600.0;
		let recency = 0.5f64.powf(age_hours / self.half_life_hours);
		let frequency = 1.0 - (-(record.use_count as f64) / self.saturation_uses).exp();
		let floor = self.recency_floor.clamp(0.0, 1.0);
		frequency * (floor + (1.0 - floor) * recency)
	}
}

/// Frecency scores frozen at one instant. Unknown ids score `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrecencySnapshot {
	scores: HashMap<PromptId, f64>,
}

impl FrecencySnapshot {
	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	/// Build a snapshot from precomputed scores.
	#[must_use]
	pub fn from_scores<I>(scores: I) -> Self
	where
		I: IntoIterator<Item = (PromptId, f64)>,
	{
		Self {
			scores: scores.into_iter().collect(),
		}
	}

	#[must_use]
	pub fn score(&self, id: &PromptId) -> f64 {
		self.scores.get(id).copied().unwrap_or(0.0)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.scores.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.scores.is_empty()
	}
}

/// Records prompt usage and turns counters into bounded ranking scores.
#[derive(Clone)]
pub struct FrecencyTracker {
	store: Arc<dyn UsageStore>,
	params: FrecencyParams,
}

impl FrecencyTracker {
	pub fn new(store: Arc<dyn UsageStore>, params: FrecencyParams) -> Self {
		Self { store, params }
	}

	#[must_use]
	pub fn params(&self) -> FrecencyParams {
		self.params
	}

	/// Count one use of `id` at `at`.
	pub fn record_use(
		&self,
		id: &PromptId,
		at: DateTime<Utc>,
	) -> Result<UsageRecord, UsageRecordError> {
		let record = self.store.record(id, at)?;
		tracing::debug!(prompt = %id, uses = record.use_count, "recorded prompt use");
		Ok(record)
	}

	pub fn record_use_now(&self, id: &PromptId) -> Result<UsageRecord, UsageRecordError> {
		self.record_use(id, Utc::now())
	}

	/// Score a single prompt as of `now`.
	pub fn score(&self, id: &PromptId, now: DateTime<Utc>) -> Result<f64, UsageRecordError> {
		Ok(self
			.store
			.get(id)?
			.map(|record| self.params.score(&record, now))
			.unwrap_or(0.0))
	}

	/// Score every known prompt as of `now`.
	pub fn snapshot(&self, now: DateTime<Utc>) -> Result<FrecencySnapshot, UsageRecordError> {
		let records = self.store.snapshot()?;
		Ok(FrecencySnapshot::from_scores(records.into_iter().map(
			|(id, record)| {
				let score = self.params.score(&record, now);
				(id, score)
			},
		)))
	}

	/// Every usage record, most used first, ties by id.
	pub fn records(&self) -> Result<Vec<(PromptId, UsageRecord)>, UsageRecordError> {
		let mut records: Vec<_> = self.store.snapshot()?.into_iter().collect();
		records.sort_by(|(a_id, a), (b_id, b)| {
			b.use_count.cmp(&a.use_count).then_with(|| a_id.cmp(b_id))
		});
		Ok(records)
	}
}
