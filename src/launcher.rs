//! Single-threaded driver wiring the pipeline together.
//!
//! The [`Launcher`] owns the snapshots and collaborators, feeds input events
//! through [`transition`] and performs the effects it returns. Scheduling is
//! left to the caller: every entry point takes the current [`Instant`], and
//! [`Launcher::tick`] releases debounced queries once they settle.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::corpus::{CorpusProvider, CorpusSnapshot};
use crate::dispatch::{
	DispatchOutcome, DispatchRequest, LogNotificationSink, Notification, NotificationKind,
	NotificationSink, PasteOrchestrator,
};
use crate::frecency::FrecencySnapshot;
use crate::search::{DEFAULT_DEBOUNCE, QueryCoalescer, Ranker, RankingEngine};
use crate::selection::{Effect, Event, SelectionState, transition};

pub struct Launcher<R: Ranker = RankingEngine> {
	corpus: CorpusSnapshot,
	corpus_error: Option<String>,
	ranker: R,
	coalescer: QueryCoalescer,
	orchestrator: PasteOrchestrator,
	sink: Arc<dyn NotificationSink>,
	state: SelectionState,
	dismissed: bool,
}

impl<R: Ranker> Launcher<R> {
	/// Build a launcher over `corpus` and rank the initial browse list.
	pub fn new(corpus: CorpusSnapshot, ranker: R, orchestrator: PasteOrchestrator) -> Self {
		let mut launcher = Self {
			corpus,
			corpus_error: None,
			ranker,
			coalescer: QueryCoalescer::new(DEFAULT_DEBOUNCE),
			orchestrator,
			sink: Arc::new(LogNotificationSink),
			state: SelectionState::new(),
			dismissed: false,
		};
		launcher.rank_now(String::new());
		launcher
	}

	/// Build a launcher from a provider. A load failure leaves the corpus
	/// empty and is surfaced once through the notification sink.
	pub fn load(
		provider: &dyn CorpusProvider,
		ranker: R,
		orchestrator: PasteOrchestrator,
		sink: Arc<dyn NotificationSink>,
	) -> Self {
		let (corpus, error) = match CorpusSnapshot::load(provider) {
			Ok(corpus) => (corpus, None),
			Err(err) => {
				tracing::warn!(error = %err, "failed to load corpus");
				(CorpusSnapshot::empty(), Some(err.to_string()))
			}
		};

		let mut launcher = Self::new(corpus, ranker, orchestrator).with_sink(sink);
		if let Some(detail) = error {
			launcher.report_corpus_error(detail);
		}
		launcher
	}

	#[must_use]
	pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
		self.sink = sink;
		self
	}

	#[must_use]
	pub fn with_debounce(mut self, delay: Duration) -> Self {
		self.coalescer = QueryCoalescer::new(delay);
		self
	}

	#[must_use]
	pub fn state(&self) -> &SelectionState {
		&self.state
	}

	#[must_use]
	pub fn corpus(&self) -> &CorpusSnapshot {
		&self.corpus
	}

	/// Message of the corpus load failure, if loading failed.
	#[must_use]
	pub fn corpus_error(&self) -> Option<&str> {
		self.corpus_error.as_deref()
	}

	#[must_use]
	pub fn ranker(&self) -> &R {
		&self.ranker
	}

	#[must_use]
	pub fn orchestrator(&self) -> &PasteOrchestrator {
		&self.orchestrator
	}

	/// Whether the surface asked to be closed.
	#[must_use]
	pub fn is_dismissed(&self) -> bool {
		self.dismissed
	}

	/// When the next debounced query becomes ready.
	#[must_use]
	pub fn next_deadline(&self) -> Option<Instant> {
		self.coalescer.deadline()
	}

	/// Feed one input event and perform the resulting effects.
	///
	/// A confirm or submit settles any query still inside its debounce window
	/// first, so the selection always belongs to the query on screen.
	pub fn handle(&mut self, event: Event, now: Instant) {
		if matches!(event, Event::Confirm | Event::SubmitVariables(_)) {
			self.flush();
		}
		let mut queue = VecDeque::from([event]);
		while let Some(event) = queue.pop_front() {
			let state = std::mem::take(&mut self.state);
			let (state, effects) = transition(state, event);
			self.state = state;
			for effect in effects {
				if let Some(follow_up) = self.perform(effect, now) {
					queue.push_back(follow_up);
				}
			}
		}
	}

	/// Rank the pending query if its debounce window elapsed. Returns whether
	/// a ranking ran.
	pub fn tick(&mut self, now: Instant) -> bool {
		match self.coalescer.take_ready(now) {
			Some(pending) => {
				tracing::trace!(generation = pending.generation, "query settled");
				self.rank_now(pending.text);
				true
			}
			None => false,
		}
	}

	/// Rank the pending query immediately, skipping the rest of its window.
	pub fn flush(&mut self) -> bool {
		match self.coalescer.flush() {
			Some(pending) => {
				self.rank_now(pending.text);
				true
			}
			None => false,
		}
	}

	/// Swap in a freshly loaded corpus and re-rank the current query.
	pub fn reload(&mut self, provider: &dyn CorpusProvider) {
		match CorpusSnapshot::load(provider) {
			Ok(corpus) => {
				self.corpus = corpus;
				self.corpus_error = None;
			}
			Err(err) => {
				tracing::warn!(error = %err, "failed to reload corpus");
				self.corpus = CorpusSnapshot::empty();
				self.report_corpus_error(err.to_string());
			}
		}
		let query = self.state.query().to_string();
		self.rank_now(query);
	}

	fn report_corpus_error(&mut self, detail: String) {
		self.sink.notify(&Notification {
			kind: NotificationKind::Error,
			title: "Prompts could not be loaded".to_string(),
			detail: detail.clone(),
		});
		self.corpus_error = Some(detail);
	}

	fn perform(&mut self, effect: Effect, now: Instant) -> Option<Event> {
		match effect {
			Effect::ScheduleRank(text) => {
				self.coalescer.push(text, now);
				None
			}
			Effect::Dispatch(request) => Some(Event::DispatchSettled(self.dispatch(&request))),
			Effect::Notify(notification) => {
				self.sink.notify(&notification);
				None
			}
			Effect::Dismiss => {
				self.dismissed = true;
				None
			}
		}
	}

	fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
		let orchestrator = &self.orchestrator;
		panic::catch_unwind(AssertUnwindSafe(|| orchestrator.dispatch(request, Utc::now())))
			.unwrap_or_else(|payload| {
				let reason = panic_message(payload.as_ref());
				tracing::error!(prompt = %request.prompt.id, reason, "dispatch panicked");
				DispatchOutcome::internal_failure(reason)
			})
	}

	fn rank_now(&mut self, query: String) {
		let frecency = self
			.orchestrator
			.tracker()
			.snapshot(Utc::now())
			.unwrap_or_else(|err| {
				tracing::warn!(error = %err, "ranking without frecency");
				FrecencySnapshot::empty()
			});
		let results = self.ranker.rank(&query, &self.corpus, &frecency);
		let state = std::mem::take(&mut self.state);
		let (state, effects) = transition(state, Event::ResultsRanked { query, results });
		self.state = state;
		debug_assert!(effects.is_empty());
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	payload
		.downcast_ref::<&str>()
		.copied()
		.or_else(|| payload.downcast_ref::<String>().map(String::as_str))
		.unwrap_or("unexpected internal error")
}
