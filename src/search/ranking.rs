//! Orders the corpus for a query by blending fuzzy relevance with frecency.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use super::MAX_RENDERED_RESULTS;
use super::matcher::FuzzyMatcher;
use crate::corpus::CorpusSnapshot;
use crate::frecency::FrecencySnapshot;
use crate::types::{HighlightRange, Prompt};

/// Which prompt field produced the highlight of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
	Name,
	Tag(String),
	Description,
	Content,
}

impl MatchField {
	/// Multiplier applied to the fuzzy score of this field.
	#[must_use]
	pub fn weight(&self) -> f64 {
		match self {
			Self::Name => 1.0,
			Self::Tag(_) => 0.75,
			Self::Description => 0.5,
			Self::Content => 0.25,
		}
	}

	/// Text of this field within `prompt`.
	#[must_use]
	pub fn text<'a>(&'a self, prompt: &'a Prompt) -> &'a str {
		match self {
			Self::Name => &prompt.name,
			Self::Tag(tag) => tag,
			Self::Description => &prompt.description,
			Self::Content => &prompt.content,
		}
	}
}

/// One ranked prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
	pub prompt: Arc<Prompt>,
	pub score: f64,
	/// Field the highlights refer to; `None` for an empty query.
	pub field: Option<MatchField>,
	pub highlights: Vec<HighlightRange>,
}

/// Blend weights for non-empty queries. The fuzzy weight should dominate so
/// that frecency only separates near ties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
	pub fuzzy: f64,
	pub frecency: f64,
}

impl Default for RankingWeights {
	fn default() -> Self {
		Self {
			fuzzy: 0.95,
			frecency: 0.05,
		}
	}
}

/// Produces an ordered result list from a query and two snapshots.
pub trait Ranker: Send + Sync {
	fn rank(
		&self,
		query: &str,
		corpus: &CorpusSnapshot,
		frecency: &FrecencySnapshot,
	) -> Vec<SearchResult>;
}

/// Default [`Ranker`]. Output is a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
	weights: RankingWeights,
	limit: usize,
}

impl Default for RankingEngine {
	fn default() -> Self {
		Self::new(RankingWeights::default(), MAX_RENDERED_RESULTS)
	}
}

struct FieldMatch {
	best: f64,
	field: MatchField,
	highlights: Vec<HighlightRange>,
}

impl RankingEngine {
	#[must_use]
	pub fn new(weights: RankingWeights, limit: usize) -> Self {
		Self { weights, limit }
	}

	#[must_use]
	pub fn weights(&self) -> RankingWeights {
		self.weights
	}

	fn browse(&self, corpus: &CorpusSnapshot, frecency: &FrecencySnapshot) -> Vec<SearchResult> {
		corpus
			.iter()
			.map(|prompt| SearchResult {
				prompt: Arc::clone(prompt),
				score: frecency.score(&prompt.id),
				field: None,
				highlights: Vec::new(),
			})
			.collect()
	}

	fn search(
		&self,
		query: &str,
		corpus: &CorpusSnapshot,
		frecency: &FrecencySnapshot,
	) -> Vec<SearchResult> {
		let matcher = FuzzyMatcher::for_corpus(corpus.len());
		let matches: Vec<(&Arc<Prompt>, FieldMatch)> = corpus
			.iter()
			.filter_map(|prompt| match_fields(&matcher, query, prompt).map(|m| (prompt, m)))
			.collect();

		let top = matches
			.iter()
			.map(|(_, m)| m.best)
			.fold(0.0f64, f64::max)
			.max(f64::MIN_POSITIVE);

		matches
			.into_iter()
			.map(|(prompt, m)| SearchResult {
				prompt: Arc::clone(prompt),
				score: self.weights.fuzzy * (m.best / top)
					+ self.weights.frecency * frecency.score(&prompt.id),
				field: Some(m.field),
				highlights: m.highlights,
			})
			.collect()
	}
}

impl Ranker for RankingEngine {
	/// A blank query browses by frecency. Any other query is matched exactly
	/// as typed, surrounding whitespace included.
	fn rank(
		&self,
		query: &str,
		corpus: &CorpusSnapshot,
		frecency: &FrecencySnapshot,
	) -> Vec<SearchResult> {
		let mut results = if query.trim().is_empty() {
			self.browse(corpus, frecency)
		} else {
			self.search(query, corpus, frecency)
		};

		results.sort_by(compare_results);
		results.truncate(self.limit);
		tracing::debug!(query, results = results.len(), "ranked corpus");
		results
	}
}

/// Candidate fields in priority order.
fn fields(prompt: &Prompt) -> impl Iterator<Item = MatchField> + '_ {
	std::iter::once(MatchField::Name)
		.chain(prompt.tags.iter().cloned().map(MatchField::Tag))
		.chain([MatchField::Description, MatchField::Content])
}

/// The first matching field supplies the highlight; the best weighted field
/// score is what ranks.
fn match_fields(matcher: &FuzzyMatcher, query: &str, prompt: &Prompt) -> Option<FieldMatch> {
	let mut found: Option<FieldMatch> = None;
	for field in fields(prompt) {
		let Some(m) = matcher.fuzzy_match(query, field.text(prompt)) else {
			continue;
		};
		let weighted = f64::from(m.score) * field.weight();
		match found.as_mut() {
			Some(existing) => existing.best = existing.best.max(weighted),
			None => {
				found = Some(FieldMatch {
					best: weighted,
					field,
					highlights: m.ranges,
				});
			}
		}
	}
	found
}

fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
	b.score
		.total_cmp(&a.score)
		.then_with(|| {
			a.prompt
				.name
				.to_lowercase()
				.cmp(&b.prompt.name.to_lowercase())
		})
		.then_with(|| a.prompt.name.cmp(&b.prompt.name))
		.then_with(|| a.prompt.id.cmp(&b.prompt.id))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::PromptId;

	fn corpus() -> CorpusSnapshot {
		CorpusSnapshot::new(vec![
			Prompt::new("review", "Code Review")
				.with_description("Review a pull request")
				.with_content("Review this {{language}} code")
				.with_tags(["coding"]),
			Prompt::new("reply", "Email Reply")
				.with_description("Reply to an email politely")
				.with_content("Dear {{name}},")
				.with_tags(["writing", "email"]),
			Prompt::new("summary", "Summarize")
				.with_description("Condense long text")
				.with_content("Summarize the following:")
				.with_tags(["writing"]),
		])
	}

	fn ids(results: &[SearchResult]) -> Vec<&str> {
		results.iter().map(|r| r.prompt.id.as_str()).collect()
	}

	#[test]
	fn every_result_has_a_matching_field() {
		let engine = RankingEngine::default();
		let matcher = FuzzyMatcher::new();
		let corpus = corpus();
		for query in ["re", "email", "cod", "wr", "sum", "{{", "xyz"] {
			for result in engine.rank(query, &corpus, &FrecencySnapshot::empty()) {
				let matched = fields(&result.prompt)
					.any(|field| matcher.fuzzy_match(query, field.text(&result.prompt)).is_some());
				assert!(matched, "{query:?} returned {}", result.prompt.id);
			}
		}
	}

	#[test]
	fn non_matching_prompts_are_excluded() {
		let results = RankingEngine::default().rank("xyz", &corpus(), &FrecencySnapshot::empty());
		assert!(results.is_empty());
	}

	#[test]
	fn highlight_comes_from_first_matching_field() {
		let results =
			RankingEngine::default().rank("condense", &corpus(), &FrecencySnapshot::empty());
		assert_eq!(ids(&results), vec!["summary"]);
		assert_eq!(results[0].field, Some(MatchField::Description));
		assert_eq!(results[0].highlights[0].start, 0);

		let results = RankingEngine::default().rank("cod", &corpus(), &FrecencySnapshot::empty());
		assert_eq!(results[0].prompt.id.as_str(), "review");
		assert_eq!(results[0].field, Some(MatchField::Name));
		assert_eq!(results[0].highlights, vec![HighlightRange::new(0, 3)]);
	}

	#[test]
	fn tag_matches_name_the_tag() {
		let results = RankingEngine::default().rank("writing", &corpus(), &FrecencySnapshot::empty());
		assert_eq!(ids(&results), vec!["reply", "summary"]);
		assert_eq!(results[0].field, Some(MatchField::Tag("writing".into())));
	}

	#[test]
	fn surrounding_whitespace_is_part_of_the_query() {
		let corpus = CorpusSnapshot::new(vec![Prompt::new("codex", "Codex").with_content("x")]);
		let engine = RankingEngine::default();
		assert_eq!(ids(&engine.rank("cod", &corpus, &FrecencySnapshot::empty())), vec!["codex"]);
		assert!(engine.rank("cod ", &corpus, &FrecencySnapshot::empty()).is_empty());
		assert!(engine.rank(" cod", &corpus, &FrecencySnapshot::empty()).is_empty());
	}

	#[test]
	fn empty_query_orders_by_frecency_then_name() {
		let frecency = FrecencySnapshot::from_scores([
			(PromptId::from("summary"), 0.4),
			(PromptId::from("reply"), 0.4),
		]);
		let results = RankingEngine::default().rank("   ", &corpus(), &frecency);
		assert_eq!(ids(&results), vec!["reply", "summary", "review"]);
		assert!(results.iter().all(|r| r.field.is_none() && r.highlights.is_empty()));
		assert_eq!(results[0].score, 0.4);
	}

	#[test]
	fn frecency_does_not_override_a_strong_match() {
		let corpus = CorpusSnapshot::new(vec![
			Prompt::new("exact", "Deploy").with_content("x"),
			Prompt::new("weak", "Daily Empty Profile Log Overview Yard").with_content("x"),
		]);
		let frecency = FrecencySnapshot::from_scores([(PromptId::from("weak"), 1.0)]);
		let results = RankingEngine::default().rank("deploy", &corpus, &frecency);
		assert_eq!(ids(&results), vec!["exact", "weak"]);
	}

	#[test]
	fn frecency_breaks_fuzzy_ties() {
		let corpus = CorpusSnapshot::new(vec![
			Prompt::new("a", "Notes A").with_content("x"),
			Prompt::new("b", "Notes B").with_content("x"),
		]);
		let frecency = FrecencySnapshot::from_scores([(PromptId::from("b"), 0.3)]);
		let results = RankingEngine::default().rank("notes", &corpus, &frecency);
		assert_eq!(ids(&results), vec!["b", "a"]);
	}

	#[test]
	fn equal_scores_break_by_name_then_id() {
		let corpus = CorpusSnapshot::new(vec![
			Prompt::new("2", "Same").with_content("x"),
			Prompt::new("1", "Same").with_content("x"),
			Prompt::new("0", "Other").with_content("x"),
		]);
		let results = RankingEngine::default().rank("", &corpus, &FrecencySnapshot::empty());
		assert_eq!(ids(&results), vec!["0", "1", "2"]);
	}

	#[test]
	fn ranking_is_deterministic() {
		let engine = RankingEngine::default();
		let corpus = corpus();
		let frecency = FrecencySnapshot::from_scores([(PromptId::from("reply"), 0.2)]);
		let first = engine.rank("re", &corpus, &frecency);
		let second = engine.rank("re", &corpus, &frecency);
		assert_eq!(first, second);
	}

	#[test]
	fn limit_truncates_results() {
		let engine = RankingEngine::new(RankingWeights::default(), 2);
		let results = engine.rank("", &corpus(), &FrecencySnapshot::empty());
		assert_eq!(results.len(), 2);
	}
}
