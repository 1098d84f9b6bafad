//! Records shared by the search, selection and dispatch pipeline.

mod highlight;
mod prompt;

pub use highlight::{
	HighlightRange, Segment, ranges_from_positions, segments, truncate_with_highlight,
};
pub use prompt::{Prompt, PromptId, VariableSpec};
