//! Storage backends for usage counters.

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::record::UsageRecord;
use crate::error::UsageRecordError;
use crate::types::PromptId;

/// Narrow get/record interface over the only mutable shared state of the
/// pipeline.
///
/// `record` must never lose an increment, including under concurrent calls
/// for the same id. Delivering the same use twice is acceptable.
pub trait UsageStore: Send + Sync {
	/// Count one use of `id` at `at` and return the updated record.
	fn record(&self, id: &PromptId, at: DateTime<Utc>) -> Result<UsageRecord, UsageRecordError>;

	fn get(&self, id: &PromptId) -> Result<Option<UsageRecord>, UsageRecordError>;

	/// Point-in-time copy of every record.
	fn snapshot(&self) -> Result<HashMap<PromptId, UsageRecord>, UsageRecordError>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, UsageRecordError> {
	mutex.lock().map_err(|_| UsageRecordError::Poisoned)
}

fn register(
	records: &mut HashMap<PromptId, UsageRecord>,
	id: &PromptId,
	at: DateTime<Utc>,
) -> UsageRecord {
	let record = records
		.entry(id.clone())
		.or_insert_with(|| UsageRecord::new(at));
	record.register(at);
	record.clone()
}

/// Process-local store. Counters vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
	records: Mutex<HashMap<PromptId, UsageRecord>>,
}

impl MemoryUsageStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed the store with existing records.
	#[must_use]
	pub fn with_records(records: HashMap<PromptId, UsageRecord>) -> Self {
		Self {
			records: Mutex::new(records),
		}
	}
}

impl UsageStore for MemoryUsageStore {
	fn record(&self, id: &PromptId, at: DateTime<Utc>) -> Result<UsageRecord, UsageRecordError> {
		let mut records = lock(&self.records)?;
		Ok(register(&mut records, id, at))
	}

	fn get(&self, id: &PromptId) -> Result<Option<UsageRecord>, UsageRecordError> {
		Ok(lock(&self.records)?.get(id).cloned())
	}

	fn snapshot(&self) -> Result<HashMap<PromptId, UsageRecord>, UsageRecordError> {
		Ok(lock(&self.records)?.clone())
	}
}

/// Store persisted as a JSON object keyed by prompt id.
///
/// Every `record` rewrites the file through a temporary sibling and a
/// rename. When persisting fails the increment stays in memory (and is
/// written with the next successful save) and the failure is returned.
#[derive(Debug)]
pub struct JsonUsageStore {
	path: PathBuf,
	records: Mutex<HashMap<PromptId, UsageRecord>>,
}

impl JsonUsageStore {
	/// Open the store at `path`. A missing file is an empty store.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, UsageRecordError> {
		let path = path.into();
		let records = match fs::read_to_string(&path) {
			Ok(content) if content.trim().is_empty() => HashMap::new(),
			Ok(content) => {
				serde_json::from_str(&content).map_err(|source| UsageRecordError::Parse {
					path: path.clone(),
					source,
				})?
			}
			Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
			Err(source) => return Err(UsageRecordError::Read { path, source }),
		};
		tracing::debug!(path = %path.display(), records = records.len(), "opened usage store");

		Ok(Self {
			path,
			records: Mutex::new(records),
		})
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn persist(&self, records: &HashMap<PromptId, UsageRecord>) -> Result<(), UsageRecordError> {
		let content = serde_json::to_string_pretty(records)?;
		let persist_err = |source: io::Error| UsageRecordError::Persist {
			path: self.path.clone(),
			source,
		};

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent).map_err(persist_err)?;
		}
		let staging = self.path.with_extension("json.tmp");
		fs::write(&staging, content).map_err(persist_err)?;
		fs::rename(&staging, &self.path).map_err(persist_err)
	}
}

impl UsageStore for JsonUsageStore {
	fn record(&self, id: &PromptId, at: DateTime<Utc>) -> Result<UsageRecord, UsageRecordError> {
		let mut records = lock(&self.records)?;
		let updated = register(&mut records, id, at);
		self.persist(&records)?;
		Ok(updated)
	}

	fn get(&self, id: &PromptId) -> Result<Option<UsageRecord>, UsageRecordError> {
		Ok(lock(&self.records)?.get(id).cloned())
	}

	fn snapshot(&self) -> Result<HashMap<PromptId, UsageRecord>, UsageRecordError> {
		Ok(lock(&self.records)?.clone())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;

	use super::*;

	#[test]
	fn concurrent_records_never_undercount() {
		let store = Arc::new(MemoryUsageStore::new());
		let id = PromptId::from("shared");
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let store = Arc::clone(&store);
				let id = id.clone();
				thread::spawn(move || {
					for _ in 0..100 {
						store.record(&id, Utc::now()).expect("record");
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().expect("join");
		}

		let record = store.get(&id).expect("get").expect("present");
		assert_eq!(record.use_count, 800);
	}

	#[test]
	fn json_store_round_trips_through_disk() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("nested").join("usage.json");

		let store = JsonUsageStore::open(&path).expect("open");
		store.record(&PromptId::from("a"), Utc::now()).expect("record");
		store.record(&PromptId::from("a"), Utc::now()).expect("record");
		drop(store);

		let reopened = JsonUsageStore::open(&path).expect("reopen");
		let record = reopened
			.get(&PromptId::from("a"))
			.expect("get")
			.expect("present");
		assert_eq!(record.use_count, 2);
		assert!(!path.with_extension("json.tmp").exists());
	}

	#[test]
	fn missing_file_opens_empty() {
		let dir = tempfile::tempdir().expect("tempdir");
		let store = JsonUsageStore::open(dir.path().join("usage.json")).expect("open");
		assert!(store.snapshot().expect("snapshot").is_empty());
	}

	#[test]
	fn corrupt_file_reports_parse_error() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("usage.json");
		fs::write(&path, "{not json").expect("write");
		let err = JsonUsageStore::open(&path).unwrap_err();
		assert!(matches!(err, UsageRecordError::Parse { .. }));
	}

	#[test]
	fn failed_persist_keeps_the_increment() {
		let dir = tempfile::tempdir().expect("tempdir");
		// A directory where the file should be makes every rename fail.
		let path = dir.path().join("usage.json");
		fs::create_dir(&path).expect("mkdir");
		fs::write(path.join("keep"), "x").expect("write");

		let store = JsonUsageStore {
			path: path.clone(),
			records: Mutex::new(HashMap::new()),
		};
		let err = store.record(&PromptId::from("a"), Utc::now()).unwrap_err();
		assert!(matches!(err, UsageRecordError::Persist { .. }));

		let record = store
			.get(&PromptId::from("a"))
			.expect("get")
			.expect("present");
		assert_eq!(record.use_count, 1);
	}
}
