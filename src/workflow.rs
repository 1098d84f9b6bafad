use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use promptdeck::Launcher;
use promptdeck::corpus::JsonCorpus;
use promptdeck::dispatch::{
	Clipboard, CommandClipboard, CommandPaste, DispatchOutcome, LogNotificationSink,
	PasteOrchestrator, PasteTrigger, Platform,
};
use promptdeck::frecency::{FrecencyTracker, JsonUsageStore, MemoryUsageStore, UsageStore};
use promptdeck::search::{RankingEngine, SearchResult};
use promptdeck::selection::{Event, Phase};
use promptdeck::template::ValidationErrors;
use promptdeck::Prompt;

use crate::cli::StatsRow;
use crate::settings::ResolvedConfig;

/// How a `use` invocation ended.
pub(crate) enum UseOutcome {
	Dispatched {
		prompt: Arc<Prompt>,
		outcome: DispatchOutcome,
	},
	Invalid {
		prompt: Arc<Prompt>,
		errors: ValidationErrors,
	},
	NoMatch,
}

/// Drives a [`Launcher`] built from the resolved configuration for one
/// command-line invocation.
pub(crate) struct PromptWorkflow {
	launcher: Launcher,
	stats_limit: usize,
}

impl PromptWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig, copy_only: bool) -> Result<Self> {
		let ResolvedConfig {
			corpus_path,
			usage_path,
			search,
			weights,
			frecency,
			clipboard,
		} = config;

		let store: Arc<dyn UsageStore> = match JsonUsageStore::open(&usage_path) {
			Ok(store) => Arc::new(store),
			Err(err) => {
				tracing::warn!(error = %err, "usage counters unavailable; ranking without history");
				Arc::new(MemoryUsageStore::new())
			}
		};
		let tracker = FrecencyTracker::new(store, frecency);

		let platform = Platform::current();
		let clipboard_backend: Arc<dyn Clipboard> = match clipboard.copy_command.clone() {
			Some(copy) => Arc::new(CommandClipboard::new(Some(copy), platform.read_command())),
			None => Arc::new(CommandClipboard::detect()),
		};
		let paste: Arc<dyn PasteTrigger> = match clipboard.paste_command.clone() {
			Some(command) => Arc::new(CommandPaste::new(Some(command))),
			None => Arc::new(CommandPaste::detect()),
		};

		let orchestrator = PasteOrchestrator::new(tracker, clipboard_backend, paste)
			.with_paste_delay(clipboard.paste_delay())
			.with_paste_enabled(!copy_only);
		let launcher = Launcher::load(
			&JsonCorpus::new(corpus_path),
			RankingEngine::new(weights, search.limit),
			orchestrator,
			Arc::new(LogNotificationSink),
		)
		.with_debounce(search.debounce());

		Ok(Self {
			launcher,
			stats_limit: search.limit,
		})
	}

	/// Rank the corpus for `query` without waiting out the debounce window.
	pub(crate) fn search(&mut self, query: &str) -> &[SearchResult] {
		self.launcher
			.handle(Event::QueryChanged(query.to_string()), Instant::now());
		self.launcher.flush();
		self.launcher.state().results()
	}

	/// Select the best match for `query`, fill its variables from `values`
	/// and dispatch it.
	pub(crate) fn use_prompt(&mut self, query: &str, values: HashMap<String, String>) -> UseOutcome {
		if self.search(query).is_empty() {
			return UseOutcome::NoMatch;
		}

		self.launcher.handle(Event::Confirm, Instant::now());
		if matches!(self.launcher.state().phase(), Phase::CollectingVariables { .. }) {
			self.launcher
				.handle(Event::SubmitVariables(values), Instant::now());
		}

		let state = self.launcher.state();
		match (state.phase(), state.last_outcome(), state.selected()) {
			(Phase::CollectingVariables { prompt, errors }, _, _) => UseOutcome::Invalid {
				prompt: Arc::clone(prompt),
				errors: errors.clone(),
			},
			(_, Some(outcome), Some(selected)) => UseOutcome::Dispatched {
				prompt: Arc::clone(&selected.prompt),
				outcome: outcome.clone(),
			},
			_ => UseOutcome::NoMatch,
		}
	}

	/// Usage counters joined with prompt names, most used first.
	pub(crate) fn stats(&self) -> Result<Vec<StatsRow>> {
		let records = self.launcher.orchestrator().tracker().records()?;
		Ok(records
			.into_iter()
			.take(self.stats_limit)
			.map(|(id, record)| {
				let name = self
					.launcher
					.corpus()
					.get(&id)
					.map(|prompt| prompt.name.clone());
				StatsRow { id, name, record }
			})
			.collect())
	}
}
