use std::collections::HashMap;

use crate::dispatch::{DispatchOutcome, DispatchRequest, Notification};
use crate::search::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Up,
	Down,
}

/// Discrete input consumed by [`super::transition`]. Mapping key presses to
/// these is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	QueryChanged(String),
	/// Ranking finished for `query`. Ignored unless `query` is still current.
	ResultsRanked {
		query: String,
		results: Vec<SearchResult>,
	},
	Navigate(Direction),
	Confirm,
	Cancel,
	SubmitVariables(HashMap<String, String>),
	DispatchSettled(DispatchOutcome),
}

/// Work requested by a transition. The driver performs it and feeds the
/// result back as another [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
	/// Re-rank for this query text (subject to debouncing).
	ScheduleRank(String),
	Dispatch(DispatchRequest),
	Notify(Notification),
	/// Close the launcher surface.
	Dismiss,
}
