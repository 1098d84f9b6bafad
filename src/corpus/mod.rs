//! Access to the prompt corpus.
//!
//! Storage formats belong to whoever authors prompts. The pipeline only needs
//! "give me every prompt", captured as an immutable [`CorpusSnapshot`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CorpusLoadError;
use crate::types::{Prompt, PromptId};

/// Source of prompt records. Order of the returned prompts is irrelevant.
pub trait CorpusProvider: Send + Sync {
	fn get_all_prompts(&self) -> Result<Vec<Prompt>, CorpusLoadError>;
}

/// Immutable view of the corpus at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
	prompts: Arc<[Arc<Prompt>]>,
}

impl CorpusSnapshot {
	#[must_use]
	pub fn new(prompts: Vec<Prompt>) -> Self {
		Self {
			prompts: prompts.into_iter().map(Arc::new).collect(),
		}
	}

	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	/// Load a snapshot, dropping records that fail validation.
	pub fn load(provider: &dyn CorpusProvider) -> Result<Self, CorpusLoadError> {
		let prompts = provider.get_all_prompts()?;
		let total = prompts.len();
		let valid: Vec<Prompt> = prompts
			.into_iter()
			.filter(|prompt| match prompt.validate() {
				Ok(()) => true,
				Err(reason) => {
					tracing::warn!(prompt = %prompt.id, reason, "skipping invalid prompt");
					false
				}
			})
			.collect();
		tracing::info!(loaded = valid.len(), skipped = total - valid.len(), "loaded corpus");
		Ok(Self::new(valid))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<Prompt>> {
		self.prompts.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.prompts.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.prompts.is_empty()
	}

	#[must_use]
	pub fn get(&self, id: &PromptId) -> Option<&Arc<Prompt>> {
		self.prompts.iter().find(|prompt| &prompt.id == id)
	}
}

/// Provider over an in-memory list of prompts.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
	prompts: Vec<Prompt>,
}

impl StaticCorpus {
	#[must_use]
	pub fn new(prompts: Vec<Prompt>) -> Self {
		Self { prompts }
	}
}

impl CorpusProvider for StaticCorpus {
	fn get_all_prompts(&self) -> Result<Vec<Prompt>, CorpusLoadError> {
		Ok(self.prompts.clone())
	}
}

/// Provider reading a JSON array of prompts from a file.
#[derive(Debug, Clone)]
pub struct JsonCorpus {
	path: PathBuf,
}

impl JsonCorpus {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl CorpusProvider for JsonCorpus {
	fn get_all_prompts(&self) -> Result<Vec<Prompt>, CorpusLoadError> {
		let content = fs::read_to_string(&self.path).map_err(|source| CorpusLoadError::Read {
			path: self.path.clone(),
			source,
		})?;
		let records: Vec<serde_json::Value> =
			serde_json::from_str(&content).map_err(|source| CorpusLoadError::Parse {
				path: self.path.clone(),
				source,
			})?;

		// One broken record must not hide the rest of the file.
		Ok(records
			.into_iter()
			.enumerate()
			.filter_map(|(index, record)| match serde_json::from_value::<Prompt>(record) {
				Ok(prompt) => Some(prompt),
				Err(err) => {
					tracing::warn!(
						path = %self.path.display(),
						index,
						error = %err,
						"skipping unreadable prompt record"
					);
					None
				}
			})
			.collect())
	}
}
