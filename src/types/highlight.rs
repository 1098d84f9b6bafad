use std::ops::Range;

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Half-open span of character (not byte) positions in a matched field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
	pub start: usize,
	pub end: usize,
}

impl HighlightRange {
	#[must_use]
	pub fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.end.saturating_sub(self.start)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[must_use]
	pub fn contains(&self, index: usize) -> bool {
		(self.start..self.end).contains(&index)
	}

	/// Slice the covered characters out of `text`.
	#[must_use]
	pub fn slice<'a>(&self, text: &'a str) -> &'a str {
		let bytes = char_span_to_bytes(text, self.start..self.end);
		&text[bytes]
	}
}

/// Collapse sorted character positions into contiguous ranges.
#[must_use]
pub fn ranges_from_positions(positions: &[usize]) -> Vec<HighlightRange> {
	let mut ranges: Vec<HighlightRange> = Vec::new();
	for &position in positions {
		match ranges.last_mut() {
			Some(last) if last.end == position => last.end += 1,
			_ => ranges.push(HighlightRange::new(position, position + 1)),
		}
	}
	ranges
}

/// A run of text that is either entirely highlighted or entirely plain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	pub text: String,
	pub highlighted: bool,
}

/// Split `text` into alternating plain and highlighted runs.
#[must_use]
pub fn segments(text: &str, ranges: &[HighlightRange]) -> Vec<Segment> {
	let mut segments: Vec<Segment> = Vec::new();
	for (idx, ch) in text.chars().enumerate() {
		let highlighted = ranges.iter().any(|range| range.contains(idx));
		match segments.last_mut() {
			Some(segment) if segment.highlighted == highlighted => segment.text.push(ch),
			_ => segments.push(Segment {
				text: ch.to_string(),
				highlighted,
			}),
		}
	}
	segments
}

/// Truncate `text` to `max_width` terminal columns from the right, appending
/// an ellipsis and dropping highlight ranges that fall off the end.
#[must_use]
pub fn truncate_with_highlight(
	text: &str,
	ranges: &[HighlightRange],
	max_width: usize,
) -> (String, Vec<HighlightRange>) {
	if max_width == 0 {
		return (String::new(), Vec::new());
	}
	if text.width() <= max_width {
		return (text.to_string(), ranges.to_vec());
	}

	let ellipsis = "…";
	let ellipsis_width = ellipsis.width();
	if max_width <= ellipsis_width {
		return (ellipsis.to_string(), Vec::new());
	}

	let available = max_width - ellipsis_width;
	let mut used = 0;
	let mut kept = 0;
	let mut truncated = String::new();
	for ch in text.chars() {
		let width = ch.width().unwrap_or(0);
		if used + width > available {
			break;
		}
		used += width;
		kept += 1;
		truncated.push(ch);
	}
	truncated.push_str(ellipsis);

	let ranges = ranges
		.iter()
		.filter(|range| range.start < kept)
		.map(|range| HighlightRange::new(range.start, range.end.min(kept)))
		.collect();
	(truncated, ranges)
}

fn char_span_to_bytes(text: &str, span: Range<usize>) -> Range<usize> {
	let mut start = text.len();
	let mut end = text.len();
	for (count, (byte, _)) in text.char_indices().enumerate() {
		if count == span.start {
			start = byte;
		}
		if count == span.end {
			end = byte;
			break;
		}
	}
	start.min(end)..end
}
