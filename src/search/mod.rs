//! Query matching, ranking and debounced query delivery.

mod coalescer;
mod config;
mod matcher;
mod ranking;

pub use coalescer::{DEFAULT_DEBOUNCE, PendingQuery, QueryCoalescer};
pub use matcher::{FuzzyMatch, FuzzyMatcher};
pub use ranking::{MatchField, Ranker, RankingEngine, RankingWeights, SearchResult};

pub(crate) const PREFILTER_ENABLE_THRESHOLD: usize = 1_000;
pub(crate) const ALIGNMENT_MAX_LEN: usize = 512;
/// Default cap on the number of ranked results handed to a view.
pub const MAX_RENDERED_RESULTS: usize = 2_000;
