use promptdeck::dispatch::{DEFAULT_PASTE_DELAY, ShellCommand};
use serde::Deserialize;

use super::super::resolved::ClipboardSettings;

/// Clipboard helpers as argv lists. Unset commands fall back to platform
/// detection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ClipboardSection {
	pub(super) copy_command: Option<Vec<String>>,
	pub(super) paste_command: Option<Vec<String>>,
	pub(super) paste_delay_ms: Option<u64>,
}

impl ClipboardSection {
	pub(super) fn resolve(self) -> ClipboardSettings {
		ClipboardSettings {
			copy_command: self.copy_command.as_deref().and_then(ShellCommand::from_argv),
			paste_command: self.paste_command.as_deref().and_then(ShellCommand::from_argv),
			paste_delay_ms: self
				.paste_delay_ms
				.unwrap_or(DEFAULT_PASTE_DELAY.as_millis() as u64),
		}
	}
}
