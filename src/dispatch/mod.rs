//! Getting a rendered prompt out of the launcher: clipboard write, optional
//! paste keystroke, and an honest report of what happened.

mod adapters;
mod orchestrator;
mod outcome;

pub use adapters::{
	Clipboard, CommandClipboard, CommandPaste, PasteTrigger, Platform, ShellCommand,
};
pub use orchestrator::{DEFAULT_PASTE_DELAY, DispatchRequest, PasteOrchestrator};
pub use outcome::{
	DispatchOutcome, LogNotificationSink, Notification, NotificationKind, NotificationSink,
};
