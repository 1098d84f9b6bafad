use std::fmt;

use serde::Serialize;

/// What happened to one dispatch. `paste_likely_success` is a best guess:
/// delivery to the target application is never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
	pub clipboard_success: bool,
	pub paste_attempted: bool,
	pub paste_likely_success: bool,
	pub message: String,
}

impl DispatchOutcome {
	/// Copied, paste not requested.
	#[must_use]
	pub fn copied() -> Self {
		Self {
			clipboard_success: true,
			paste_attempted: false,
			paste_likely_success: false,
			message: "Copied to clipboard".to_string(),
		}
	}

	#[must_use]
	pub fn pasted() -> Self {
		Self {
			clipboard_success: true,
			paste_attempted: true,
			paste_likely_success: true,
			message: "Copied and pasted".to_string(),
		}
	}

	/// Copied, but the paste keystroke could not be sent.
	#[must_use]
	pub fn paste_uncertain() -> Self {
		Self {
			clipboard_success: true,
			paste_attempted: true,
			paste_likely_success: false,
			message: "Copied to clipboard - press Ctrl+V if not pasted".to_string(),
		}
	}

	pub fn clipboard_failed(reason: impl fmt::Display) -> Self {
		Self {
			clipboard_success: false,
			paste_attempted: false,
			paste_likely_success: false,
			message: format!("Failed to copy to clipboard: {reason}"),
		}
	}

	/// A fault inside the pipeline itself.
	pub fn internal_failure(reason: impl fmt::Display) -> Self {
		Self {
			clipboard_success: false,
			paste_attempted: false,
			paste_likely_success: false,
			message: format!("Something went wrong while copying: {reason}"),
		}
	}

	#[must_use]
	pub fn kind(&self) -> NotificationKind {
		if !self.clipboard_success {
			NotificationKind::Error
		} else if self.paste_attempted && !self.paste_likely_success {
			NotificationKind::Partial
		} else {
			NotificationKind::Success
		}
	}

	/// Classified notification for an external renderer.
	#[must_use]
	pub fn notification(&self, prompt_name: &str) -> Notification {
		let kind = self.kind();
		let title = match kind {
			NotificationKind::Success => format!("{prompt_name} ready"),
			NotificationKind::Partial => format!("{prompt_name} copied"),
			NotificationKind::Error => format!("{prompt_name} was not copied"),
		};
		Notification {
			kind,
			title,
			detail: self.message.clone(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
	Success,
	Partial,
	Error,
}

impl fmt::Display for NotificationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Success => "success",
			Self::Partial => "partial",
			Self::Error => "error",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
	pub kind: NotificationKind,
	pub title: String,
	pub detail: String,
}

/// Receives classified outcomes. Presentation is up to the implementor.
pub trait NotificationSink: Send + Sync {
	fn notify(&self, notification: &Notification);
}

/// Sink that forwards notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
	fn notify(&self, notification: &Notification) {
		match notification.kind {
			NotificationKind::Error => {
				tracing::warn!(title = %notification.title, detail = %notification.detail, "launcher error");
			}
			kind => {
				tracing::info!(%kind, title = %notification.title, detail = %notification.detail, "launcher notice");
			}
		}
	}
}
