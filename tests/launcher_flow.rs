//! End-to-end flows through the launcher with in-memory collaborators.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use promptdeck::corpus::{CorpusProvider, CorpusSnapshot, JsonCorpus, StaticCorpus};
use promptdeck::dispatch::{
	Clipboard, Notification, NotificationKind, NotificationSink, PasteOrchestrator, PasteTrigger,
};
use promptdeck::error::{ClipboardError, CorpusLoadError, PasteError};
use promptdeck::frecency::{FrecencyParams, FrecencySnapshot, FrecencyTracker, MemoryUsageStore, UsageStore};
use promptdeck::search::{Ranker, RankingEngine, SearchResult};
use promptdeck::selection::{Direction, Event, Phase};
use promptdeck::{HighlightRange, Launcher, Prompt, PromptId, VariableSpec};

#[derive(Default)]
struct FakeClipboard {
	fail: bool,
	written: Mutex<Vec<String>>,
}

impl Clipboard for FakeClipboard {
	fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
		if self.fail {
			return Err(ClipboardError::Unavailable("held by another application".into()));
		}
		self.written.lock().unwrap().push(text.to_string());
		Ok(())
	}
}

struct PanickingClipboard;

impl Clipboard for PanickingClipboard {
	fn write_text(&self, _: &str) -> Result<(), ClipboardError> {
		panic!("clipboard backend crashed");
	}
}

struct NoPaste;

impl PasteTrigger for NoPaste {
	fn trigger_paste(&self) -> Result<(), PasteError> {
		Ok(())
	}
}

#[derive(Default)]
struct RecordingSink {
	seen: Mutex<Vec<Notification>>,
}

impl NotificationSink for RecordingSink {
	fn notify(&self, notification: &Notification) {
		self.seen.lock().unwrap().push(notification.clone());
	}
}

/// Delegates to the default engine and remembers every query it was asked.
#[derive(Default)]
struct CountingRanker {
	inner: RankingEngine,
	queries: Mutex<Vec<String>>,
}

impl Ranker for CountingRanker {
	fn rank(
		&self,
		query: &str,
		corpus: &CorpusSnapshot,
		frecency: &FrecencySnapshot,
	) -> Vec<SearchResult> {
		self.queries.lock().unwrap().push(query.to_string());
		self.inner.rank(query, corpus, frecency)
	}
}

struct FailingCorpus;

impl CorpusProvider for FailingCorpus {
	fn get_all_prompts(&self) -> Result<Vec<Prompt>, CorpusLoadError> {
		Err(CorpusLoadError::Unavailable("database locked".into()))
	}
}

fn prompts() -> Vec<Prompt> {
	vec![
		Prompt::new("dev/review", "Code Review")
			.with_content("Review this {{language}} code")
			.with_tags(["code"])
			.with_variable(VariableSpec::new("language").with_default("TypeScript").required()),
		Prompt::new("dev/commit", "Commit Message").with_content("Write a commit message"),
		Prompt::new("docs/summary", "Summarize")
			.with_description("Condense a long document")
			.with_content("Summarize the following text"),
	]
}

fn orchestrator(store: Arc<MemoryUsageStore>, clipboard: Arc<dyn Clipboard>) -> PasteOrchestrator {
	let tracker = FrecencyTracker::new(store, FrecencyParams::default());
	PasteOrchestrator::new(tracker, clipboard, Arc::new(NoPaste)).with_paste_delay(Duration::ZERO)
}

fn launcher(clipboard: Arc<dyn Clipboard>) -> (Launcher, Arc<MemoryUsageStore>) {
	let store = Arc::new(MemoryUsageStore::new());
	let launcher = Launcher::new(
		CorpusSnapshot::new(prompts()),
		RankingEngine::default(),
		orchestrator(store.clone(), clipboard),
	);
	(launcher, store)
}

fn type_query(launcher: &mut Launcher, query: &str) {
	launcher.handle(Event::QueryChanged(query.to_string()), Instant::now());
	launcher.flush();
}

fn uses(store: &MemoryUsageStore, id: &str) -> u64 {
	store
		.get(&PromptId::from(id))
		.unwrap()
		.map_or(0, |record| record.use_count)
}

#[test]
fn typing_cod_selects_code_review_and_copies_the_default() {
	let clipboard = Arc::new(FakeClipboard::default());
	let (mut launcher, store) = launcher(clipboard.clone());

	type_query(&mut launcher, "cod");
	let top = launcher.state().selected().expect("a selection");
	assert_eq!(launcher.state().selected_index(), Some(0));
	assert_eq!(top.prompt.id.as_str(), "dev/review");
	assert_eq!(top.highlights, vec![HighlightRange::new(0, 3)]);

	launcher.handle(Event::Confirm, Instant::now());
	assert!(matches!(launcher.state().phase(), Phase::CollectingVariables { .. }));

	launcher.handle(Event::SubmitVariables(HashMap::new()), Instant::now());
	assert_eq!(launcher.state().phase(), &Phase::Browsing);
	assert_eq!(
		clipboard.written.lock().unwrap().as_slice(),
		["Review this TypeScript code"]
	);
	let outcome = launcher.state().last_outcome().expect("outcome");
	assert!(outcome.clipboard_success);
	assert!(!outcome.paste_attempted);
	assert_eq!(uses(&store, "dev/review"), 1);
}

#[test]
fn submitted_values_replace_the_default() {
	let clipboard = Arc::new(FakeClipboard::default());
	let (mut launcher, store) = launcher(clipboard.clone());

	type_query(&mut launcher, "cod");
	launcher.handle(Event::Confirm, Instant::now());
	let values = HashMap::from([("language".to_string(), "Go".to_string())]);
	launcher.handle(Event::SubmitVariables(values), Instant::now());

	assert_eq!(launcher.state().phase(), &Phase::Browsing);
	assert_eq!(clipboard.written.lock().unwrap().as_slice(), ["Review this Go code"]);
	let outcome = launcher.state().last_outcome().expect("outcome");
	assert!(outcome.clipboard_success);
	assert_eq!(outcome.message, "Copied to clipboard");
	assert_eq!(uses(&store, "dev/review"), 1);
}

#[test]
fn confirm_inside_the_debounce_window_uses_the_typed_query() {
	let clipboard = Arc::new(FakeClipboard::default());
	let mut launcher = Launcher::new(
		CorpusSnapshot::new(vec![
			Prompt::new("alpha", "Alpha").with_content("alpha body"),
			Prompt::new("zeta", "Zeta").with_content("zeta body"),
		]),
		RankingEngine::default(),
		orchestrator(Arc::new(MemoryUsageStore::new()), clipboard.clone()),
	)
	.with_debounce(Duration::from_millis(150));
	assert_eq!(
		launcher.state().selected().map(|result| result.prompt.id.as_str()),
		Some("alpha")
	);

	let start = Instant::now();
	launcher.handle(Event::QueryChanged("zeta".into()), start);
	launcher.handle(Event::Confirm, start + Duration::from_millis(50));

	assert_eq!(launcher.state().query(), "zeta");
	assert_eq!(clipboard.written.lock().unwrap().as_slice(), ["zeta body"]);
	assert_eq!(launcher.next_deadline(), None);
}

#[test]
fn clipboard_failure_reports_an_error_and_counts_usage_once() {
	let clipboard = Arc::new(FakeClipboard {
		fail: true,
		..FakeClipboard::default()
	});
	let sink = Arc::new(RecordingSink::default());
	let (launcher, store) = launcher(clipboard);
	let mut launcher = launcher.with_sink(sink.clone());

	type_query(&mut launcher, "commit");
	launcher.handle(Event::Confirm, Instant::now());

	let outcome = launcher.state().last_outcome().expect("outcome");
	assert!(!outcome.clipboard_success);
	assert!(!outcome.paste_attempted);
	assert!(!outcome.paste_likely_success);
	assert!(outcome.message.starts_with("Failed to copy to clipboard"));
	assert_eq!(uses(&store, "dev/commit"), 1);

	let seen = sink.seen.lock().unwrap();
	assert_eq!(seen.len(), 1);
	assert_eq!(seen[0].kind, NotificationKind::Error);
}

#[test]
fn rapid_typing_ranks_only_the_settled_query() {
	let store = Arc::new(MemoryUsageStore::new());
	let mut launcher = Launcher::new(
		CorpusSnapshot::new(prompts()),
		CountingRanker::default(),
		orchestrator(store, Arc::new(FakeClipboard::default())),
	)
	.with_debounce(Duration::from_millis(150));
	assert_eq!(launcher.ranker().queries.lock().unwrap().len(), 1);

	let start = Instant::now();
	launcher.handle(Event::QueryChanged("c".into()), start);
	launcher.handle(Event::QueryChanged("co".into()), start + Duration::from_millis(50));
	launcher.handle(Event::QueryChanged("cod".into()), start + Duration::from_millis(100));

	assert!(!launcher.tick(start + Duration::from_millis(200)));
	assert_eq!(launcher.next_deadline(), Some(start + Duration::from_millis(250)));
	assert!(launcher.tick(start + Duration::from_millis(260)));
	assert!(!launcher.tick(start + Duration::from_millis(600)));

	let queries = launcher.ranker().queries.lock().unwrap();
	assert_eq!(queries.as_slice(), ["", "cod"]);
	assert_eq!(launcher.state().query(), "cod");
}

#[test]
fn variable_names_with_regex_characters_substitute_literally() {
	let clipboard = Arc::new(FakeClipboard::default());
	let store = Arc::new(MemoryUsageStore::new());
	let prompt = Prompt::new("fmt", "Formatter")
		.with_content("Value: {{a.b}} and {{axb}}")
		.with_variable(VariableSpec::new("a.b").required());
	let mut launcher = Launcher::new(
		CorpusSnapshot::new(vec![prompt]),
		RankingEngine::default(),
		orchestrator(store, clipboard.clone()),
	);

	launcher.handle(Event::Confirm, Instant::now());
	let values = HashMap::from([("a.b".to_string(), "$1 X".to_string())]);
	launcher.handle(Event::SubmitVariables(values), Instant::now());

	assert_eq!(
		clipboard.written.lock().unwrap().as_slice(),
		["Value: $1 X and {{axb}}"]
	);
}

#[test]
fn corpus_failure_leaves_an_empty_list_and_notifies() {
	let sink = Arc::new(RecordingSink::default());
	let mut launcher = Launcher::load(
		&FailingCorpus,
		RankingEngine::default(),
		orchestrator(Arc::new(MemoryUsageStore::new()), Arc::new(FakeClipboard::default())),
		sink.clone(),
	);

	assert!(launcher.state().results().is_empty());
	assert_eq!(launcher.corpus_error(), Some("corpus provider unavailable: database locked"));
	{
		let seen = sink.seen.lock().unwrap();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].kind, NotificationKind::Error);
		assert_eq!(seen[0].title, "Prompts could not be loaded");
	}

	launcher.handle(Event::Navigate(Direction::Down), Instant::now());
	launcher.handle(Event::Confirm, Instant::now());
	assert_eq!(launcher.state().selected_index(), None);
	assert_eq!(launcher.state().phase(), &Phase::Browsing);
}

#[test]
fn a_panicking_dispatch_returns_to_browsing_with_an_error() {
	let store = Arc::new(MemoryUsageStore::new());
	let sink = Arc::new(RecordingSink::default());
	let mut launcher = Launcher::new(
		CorpusSnapshot::new(prompts()),
		RankingEngine::default(),
		orchestrator(store, Arc::new(PanickingClipboard)),
	)
	.with_sink(sink.clone());

	type_query(&mut launcher, "commit");
	launcher.handle(Event::Confirm, Instant::now());

	assert_eq!(launcher.state().phase(), &Phase::Browsing);
	let outcome = launcher.state().last_outcome().expect("outcome");
	assert!(!outcome.clipboard_success);
	assert!(outcome.message.contains("clipboard backend crashed"));
	assert_eq!(sink.seen.lock().unwrap()[0].kind, NotificationKind::Error);

	launcher.handle(Event::Navigate(Direction::Down), Instant::now());
	assert!(launcher.state().selected_index().is_some());
}

#[test]
fn recently_used_prompts_lead_the_browse_list() {
	let store = Arc::new(MemoryUsageStore::new());
	let clipboard = Arc::new(FakeClipboard::default());

	let mut first = Launcher::new(
		CorpusSnapshot::new(prompts()),
		RankingEngine::default(),
		orchestrator(store.clone(), clipboard.clone()),
	);
	type_query(&mut first, "summ");
	first.handle(Event::Confirm, Instant::now());
	assert_eq!(uses(&store, "docs/summary"), 1);

	let second = Launcher::new(
		CorpusSnapshot::new(prompts()),
		RankingEngine::default(),
		orchestrator(store, clipboard),
	);
	let top = second.state().selected().expect("a selection");
	assert_eq!(top.prompt.id.as_str(), "docs/summary");
	assert_eq!(second.state().results().len(), 3);
}

#[test]
fn json_corpus_feeds_the_launcher_and_reloads() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prompts.json");
	fs::write(
		&path,
		r#"[
			{"id": "a", "name": "Alpha", "content": "first"},
			{"id": "b", "name": "Beta", "content": "second", "tags": ["greek"]},
			{"id": "broken", "name": "  ", "content": "nameless"}
		]"#,
	)
	.expect("write corpus");

	let corpus = JsonCorpus::new(&path);
	let mut launcher = Launcher::load(
		&corpus,
		RankingEngine::default(),
		orchestrator(Arc::new(MemoryUsageStore::new()), Arc::new(FakeClipboard::default())),
		Arc::new(RecordingSink::default()),
	);
	assert_eq!(launcher.corpus().len(), 2);
	assert_eq!(launcher.corpus_error(), None);

	type_query(&mut launcher, "greek");
	assert_eq!(launcher.state().results().len(), 1);

	fs::write(&path, r#"[{"id": "g", "name": "Gamma greek", "content": "third"}]"#)
		.expect("rewrite corpus");
	launcher.reload(&corpus);
	let ids: Vec<_> = launcher
		.state()
		.results()
		.iter()
		.map(|result| result.prompt.id.as_str())
		.collect();
	assert_eq!(ids, ["g"]);
}

#[test]
fn failed_reload_clears_the_list_and_notifies() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prompts.json");
	fs::write(&path, r#"[{"id": "a", "name": "Alpha", "content": "first"}]"#)
		.expect("write corpus");

	let corpus = JsonCorpus::new(&path);
	let sink = Arc::new(RecordingSink::default());
	let mut launcher = Launcher::load(
		&corpus,
		RankingEngine::default(),
		orchestrator(Arc::new(MemoryUsageStore::new()), Arc::new(FakeClipboard::default())),
		sink.clone(),
	);
	assert_eq!(launcher.state().results().len(), 1);
	assert!(sink.seen.lock().unwrap().is_empty());

	fs::write(&path, "[{\"id\": ").expect("truncate corpus");
	launcher.reload(&corpus);

	assert!(launcher.state().results().is_empty());
	assert!(launcher.corpus_error().is_some());
	let seen = sink.seen.lock().unwrap();
	assert_eq!(seen.len(), 1);
	assert_eq!(seen[0].kind, NotificationKind::Error);
	assert_eq!(seen[0].title, "Prompts could not be loaded");
}

#[test]
fn static_corpus_snapshots_are_independent_of_later_edits() {
	let corpus = StaticCorpus::new(prompts());
	let snapshot = CorpusSnapshot::load(&corpus).expect("load");
	assert_eq!(snapshot.len(), 3);
	assert!(snapshot.get(&PromptId::from("dev/commit")).is_some());
}
