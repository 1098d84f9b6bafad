use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::adapters::{Clipboard, PasteTrigger};
use super::outcome::DispatchOutcome;
use crate::frecency::FrecencyTracker;
use crate::types::Prompt;

/// Default pause between the clipboard write and the paste keystroke.
pub const DEFAULT_PASTE_DELAY: Duration = Duration::from_millis(100);

/// A rendered prompt ready to leave the launcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
	pub prompt: Arc<Prompt>,
	pub rendered: String,
}

impl DispatchRequest {
	#[must_use]
	pub fn new(prompt: Arc<Prompt>, rendered: String) -> Self {
		Self { prompt, rendered }
	}
}

/// Sequences usage recording, the clipboard write and the optional paste.
///
/// Usage is recorded first, so a confirmed selection counts toward frecency
/// even when the copy fails. Nothing here returns an error: every failure is
/// folded into the [`DispatchOutcome`].
pub struct PasteOrchestrator {
	tracker: FrecencyTracker,
	clipboard: Arc<dyn Clipboard>,
	paste: Arc<dyn PasteTrigger>,
	paste_delay: Duration,
	paste_enabled: bool,
}

impl PasteOrchestrator {
	pub fn new(
		tracker: FrecencyTracker,
		clipboard: Arc<dyn Clipboard>,
		paste: Arc<dyn PasteTrigger>,
	) -> Self {
		Self {
			tracker,
			clipboard,
			paste,
			paste_delay: DEFAULT_PASTE_DELAY,
			paste_enabled: true,
		}
	}

	#[must_use]
	pub fn with_paste_delay(mut self, delay: Duration) -> Self {
		self.paste_delay = delay;
		self
	}

	/// Disable the paste step even for auto-paste prompts.
	#[must_use]
	pub fn with_paste_enabled(mut self, enabled: bool) -> Self {
		self.paste_enabled = enabled;
		self
	}

	#[must_use]
	pub fn tracker(&self) -> &FrecencyTracker {
		&self.tracker
	}

	pub fn dispatch(&self, request: &DispatchRequest, at: DateTime<Utc>) -> DispatchOutcome {
		let prompt = &request.prompt;
		if let Err(err) = self.tracker.record_use(&prompt.id, at) {
			tracing::warn!(prompt = %prompt.id, error = %err, "failed to record prompt use");
		}

		if let Err(err) = self.clipboard.write_text(&request.rendered) {
			tracing::warn!(prompt = %prompt.id, error = %err, "clipboard write failed");
			return DispatchOutcome::clipboard_failed(err);
		}
		self.verify_clipboard(&request.rendered);

		let outcome = if !(prompt.auto_paste && self.paste_enabled) {
			DispatchOutcome::copied()
		} else {
			if !self.paste_delay.is_zero() {
				thread::sleep(self.paste_delay);
			}
			match self.paste.trigger_paste() {
				Ok(()) => DispatchOutcome::pasted(),
				Err(err) => {
					tracing::warn!(prompt = %prompt.id, error = %err, "paste trigger failed");
					DispatchOutcome::paste_uncertain()
				}
			}
		};
		tracing::info!(prompt = %prompt.id, message = %outcome.message, "dispatched prompt");
		outcome
	}

	fn verify_clipboard(&self, expected: &str) {
		match self.clipboard.read_text() {
			Ok(Some(actual)) if actual != expected => {
				tracing::warn!(
					expected = expected.len(),
					actual = actual.len(),
					"clipboard content differs from what was written"
				);
			}
			Ok(_) => {}
			Err(err) => tracing::debug!(error = %err, "clipboard read-back unavailable"),
		}
	}
}
