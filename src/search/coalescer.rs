//! Last-write-wins debouncing of query edits.
//!
//! The coalescer never sleeps or spawns. The driver reports the time of every
//! edit and polls with the current time; a query becomes ready once no newer
//! edit has arrived for the debounce window.

use std::time::{Duration, Instant};

/// Default settle window for query edits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Query text released by the coalescer, tagged with the generation of the
/// edit that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
	pub generation: u64,
	pub text: String,
}

#[derive(Debug)]
pub struct QueryCoalescer {
	delay: Duration,
	generation: u64,
	pending: Option<(String, Instant)>,
}

impl Default for QueryCoalescer {
	fn default() -> Self {
		Self::new(DEFAULT_DEBOUNCE)
	}
}

impl QueryCoalescer {
	#[must_use]
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			generation: 0,
			pending: None,
		}
	}

	#[must_use]
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Replace any pending query with `text`, restarting the window at `now`.
	pub fn push(&mut self, text: impl Into<String>, now: Instant) -> u64 {
		self.generation = self.generation.wrapping_add(1);
		self.pending = Some((text.into(), now));
		self.generation
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// When the pending query becomes ready, if any.
	#[must_use]
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|(_, at)| *at + self.delay)
	}

	/// Release the pending query if its window has elapsed by `now`.
	pub fn take_ready(&mut self, now: Instant) -> Option<PendingQuery> {
		let deadline = self.deadline()?;
		if now < deadline {
			return None;
		}
		self.flush()
	}

	/// Release the pending query regardless of the window.
	pub fn flush(&mut self) -> Option<PendingQuery> {
		self.pending.take().map(|(text, _)| PendingQuery {
			generation: self.generation,
			text,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: Duration = Duration::from_millis(150);

	#[test]
	fn burst_of_edits_releases_only_the_last() {
		let start = Instant::now();
		let mut coalescer = QueryCoalescer::new(WINDOW);
		coalescer.push("c", start);
		coalescer.push("co", start + Duration::from_millis(40));
		coalescer.push("cod", start + Duration::from_millis(80));

		assert_eq!(coalescer.take_ready(start + Duration::from_millis(200)), None);
		let ready = coalescer
			.take_ready(start + Duration::from_millis(230))
			.expect("ready");
		assert_eq!(ready.text, "cod");
		assert_eq!(ready.generation, 3);
		assert!(coalescer.take_ready(start + Duration::from_secs(5)).is_none());
	}

	#[test]
	fn nothing_pending_yields_nothing() {
		let mut coalescer = QueryCoalescer::default();
		assert!(!coalescer.is_pending());
		assert_eq!(coalescer.deadline(), None);
		assert_eq!(coalescer.take_ready(Instant::now()), None);
	}

	#[test]
	fn flush_ignores_the_window() {
		let now = Instant::now();
		let mut coalescer = QueryCoalescer::new(WINDOW);
		coalescer.push("x", now);
		assert_eq!(coalescer.flush().map(|q| q.text), Some("x".to_string()));
		assert!(!coalescer.is_pending());
	}
}
