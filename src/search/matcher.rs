//! Case-insensitive subsequence matching of a query against one candidate.
//!
//! Every query character must appear in the candidate, in order. Positions
//! come from the frizbee alignment when it can produce a strict alignment and
//! from a forward/backward tightening scan otherwise; both feed the same
//! scoring function so scores stay comparable across candidates.

use frizbee::{Config, match_indices};

use super::config::{config_for_corpus, should_align};
use crate::types::{HighlightRange, ranges_from_positions};

const SCORE_MATCH: i64 = 16;
const BONUS_BOUNDARY: i64 = 10;
const BONUS_CAMEL: i64 = 8;
const BONUS_CONSECUTIVE: i64 = 8;
const BONUS_FIRST_CHAR_MULTIPLIER: i64 = 2;
const PENALTY_GAP_START: i64 = 3;
const PENALTY_GAP_EXTENSION: i64 = 1;
const LEADING_BONUS_MAX: i64 = 12;
const LENGTH_PENALTY_DIVISOR: i64 = 4;
const LENGTH_PENALTY_MAX: i64 = 16;

/// A successful match: relevance score and highlighted character ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
	pub score: u32,
	pub ranges: Vec<HighlightRange>,
}

impl FuzzyMatch {
	/// Result for an empty query: neutral score, nothing highlighted.
	#[must_use]
	pub fn neutral() -> Self {
		Self {
			score: 0,
			ranges: Vec::new(),
		}
	}
}

/// Scores a query against candidate strings.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
	config: Config,
}

impl Default for FuzzyMatcher {
	fn default() -> Self {
		Self::new()
	}
}

impl FuzzyMatcher {
	#[must_use]
	pub fn new() -> Self {
		Self::for_corpus(0)
	}

	/// Matcher tuned for a corpus of `dataset_len` prompts.
	#[must_use]
	pub fn for_corpus(dataset_len: usize) -> Self {
		Self {
			config: config_for_corpus(dataset_len),
		}
	}

	/// Match `query` against `candidate`. Returns `None` when some query
	/// character cannot be placed.
	#[must_use]
	pub fn fuzzy_match(&self, query: &str, candidate: &str) -> Option<FuzzyMatch> {
		let needle: Vec<char> = query.chars().map(fold).collect();
		if needle.is_empty() {
			return Some(FuzzyMatch::neutral());
		}

		let original: Vec<char> = candidate.chars().collect();
		let folded: Vec<char> = original.iter().copied().map(fold).collect();

		let tightest = tightest_positions(&needle, &folded)?;
		let positions = self
			.aligned_positions(query, candidate, &needle, &folded)
			.unwrap_or(tightest);

		Some(FuzzyMatch {
			score: score_positions(&positions, &original, needle.len()),
			ranges: ranges_from_positions(&positions),
		})
	}

	fn aligned_positions(
		&self,
		query: &str,
		candidate: &str,
		needle: &[char],
		folded: &[char],
	) -> Option<Vec<usize>> {
		if !should_align(query, candidate) {
			return None;
		}
		let mut indices = match_indices(query, candidate, &self.config)?.indices;
		indices.sort_unstable();
		is_strict_alignment(&indices, needle, folded).then_some(indices)
	}
}

fn fold(ch: char) -> char {
	ch.to_lowercase().next().unwrap_or(ch)
}

/// Positions of the shortest window that ends at the earliest possible match
/// end, found by scanning forward for the end and backward for the start.
fn tightest_positions(needle: &[char], haystack: &[char]) -> Option<Vec<usize>> {
	let mut matched = 0;
	let mut end = None;
	for (idx, &ch) in haystack.iter().enumerate() {
		if ch == needle[matched] {
			matched += 1;
			if matched == needle.len() {
				end = Some(idx);
				break;
			}
		}
	}
	let end = end?;

	let mut positions = vec![0; needle.len()];
	let mut remaining = needle.len();
	for idx in (0..=end).rev() {
		if haystack[idx] == needle[remaining - 1] {
			remaining -= 1;
			positions[remaining] = idx;
			if remaining == 0 {
				break;
			}
		}
	}
	Some(positions)
}

fn is_strict_alignment(indices: &[usize], needle: &[char], haystack: &[char]) -> bool {
	indices.len() == needle.len()
		&& indices.windows(2).all(|pair| pair[0] < pair[1])
		&& indices
			.iter()
			.zip(needle)
			.all(|(&idx, ch)| haystack.get(idx) == Some(ch))
}

fn boundary_bonus(haystack: &[char], idx: usize) -> i64 {
	let Some(prev) = idx.checked_sub(1).map(|prev| haystack[prev]) else {
		return BONUS_BOUNDARY;
	};
	let current = haystack[idx];
	if !prev.is_alphanumeric() && current.is_alphanumeric() {
		BONUS_BOUNDARY
	} else if (prev.is_lowercase() && current.is_uppercase())
		|| (!prev.is_numeric() && current.is_numeric())
	{
		BONUS_CAMEL
	} else {
		0
	}
}

fn score_positions(positions: &[usize], haystack: &[char], needle_len: usize) -> u32 {
	let mut score = 0i64;
	for (k, &pos) in positions.iter().enumerate() {
		score += SCORE_MATCH;
		let bonus = boundary_bonus(haystack, pos);
		if k == 0 {
			score += bonus * BONUS_FIRST_CHAR_MULTIPLIER;
			continue;
		}
		score += bonus;
		let gap = (pos - positions[k - 1] - 1) as i64;
		if gap == 0 {
			score += BONUS_CONSECUTIVE;
		} else {
			score -= PENALTY_GAP_START + PENALTY_GAP_EXTENSION * (gap - 1);
		}
	}

	let start = positions.first().copied().unwrap_or_default() as i64;
	score += LEADING_BONUS_MAX - start.min(LEADING_BONUS_MAX);

	let unmatched = haystack.len().saturating_sub(needle_len) as i64;
	score -= (unmatched / LENGTH_PENALTY_DIVISOR).min(LENGTH_PENALTY_MAX);

	u32::try_from(score.max(1)).unwrap_or(1)
}
