use std::sync::Arc;

use crate::dispatch::DispatchOutcome;
use crate::search::SearchResult;
use crate::template::ValidationErrors;
use crate::types::Prompt;

/// Where the launcher is in the select, fill, dispatch cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
	#[default]
	Browsing,
	/// Waiting for values of `prompt`'s variables. `errors` holds the
	/// failures of the last submission.
	CollectingVariables {
		prompt: Arc<Prompt>,
		errors: ValidationErrors,
	},
	/// A dispatch of `prompt` is in flight.
	Dispatching { prompt: Arc<Prompt> },
}

impl Phase {
	#[must_use]
	pub fn name(&self) -> &'static str {
		match self {
			Self::Browsing => "browsing",
			Self::CollectingVariables { .. } => "collecting_variables",
			Self::Dispatching { .. } => "dispatching",
		}
	}
}

/// Everything the launcher surface shows. Created when the surface appears
/// and discarded when it is dismissed.
///
/// `selected` is `Some` exactly when `results` is non-empty, and then always
/// a valid index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
	pub(super) query: String,
	pub(super) results: Vec<SearchResult>,
	pub(super) selected: Option<usize>,
	pub(super) phase: Phase,
	pub(super) last_outcome: Option<DispatchOutcome>,
}

impl SelectionState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	#[must_use]
	pub fn results(&self) -> &[SearchResult] {
		&self.results
	}

	#[must_use]
	pub fn selected_index(&self) -> Option<usize> {
		self.selected
	}

	#[must_use]
	pub fn selected(&self) -> Option<&SearchResult> {
		self.selected.and_then(|index| self.results.get(index))
	}

	#[must_use]
	pub fn phase(&self) -> &Phase {
		&self.phase
	}

	#[must_use]
	pub fn is_dispatching(&self) -> bool {
		matches!(self.phase, Phase::Dispatching { .. })
	}

	/// Outcome of the most recently settled dispatch.
	#[must_use]
	pub fn last_outcome(&self) -> Option<&DispatchOutcome> {
		self.last_outcome.as_ref()
	}

	/// Swap in a new result list, keeping the same prompt selected when it
	/// is still present and clamping the old index otherwise.
	pub(super) fn replace_results(&mut self, results: Vec<SearchResult>) {
		let previous = self.selected().map(|result| result.prompt.id.clone());
		let old_index = self.selected.unwrap_or(0);
		self.results = results;

		self.selected = if self.results.is_empty() {
			None
		} else {
			previous
				.and_then(|id| self.results.iter().position(|result| result.prompt.id == id))
				.or(Some(old_index.min(self.results.len() - 1)))
		};
	}
}
