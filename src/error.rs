//! Error types for the launcher pipeline.
//!
//! Each failure class gets its own type so callers can decide how far it may
//! travel: corpus errors are surfaced once, usage errors are logged and
//! swallowed, clipboard errors end a dispatch, paste errors only lower the
//! confidence of the outcome. Variable validation never produces an error
//! value at all; see [`crate::template::ValidationErrors`].

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// The corpus provider could not produce a snapshot.
#[derive(Debug, Error)]
pub enum CorpusLoadError {
	#[error("failed to read corpus file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to parse corpus file {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("corpus provider unavailable: {0}")]
	Unavailable(String),
}

/// Usage counters could not be read or persisted.
#[derive(Debug, Error)]
pub enum UsageRecordError {
	#[error("failed to read usage store {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to parse usage store {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to persist usage store {path}: {source}")]
	Persist {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to serialize usage records: {0}")]
	Serialize(#[from] serde_json::Error),

	#[error("usage store lock was poisoned by a panicking writer")]
	Poisoned,

	#[error("usage store unavailable: {0}")]
	Unavailable(String),
}

/// Failure running an external helper command.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error("failed to launch `{program}`: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},

	#[error("failed to talk to `{program}`: {source}")]
	Io {
		program: String,
		#[source]
		source: io::Error,
	},

	#[error("`{program}` exited with {status}")]
	Status { program: String, status: ExitStatus },

	#[error("`{program}` produced output that is not UTF-8")]
	Encoding { program: String },
}

/// Writing (or reading back) the clipboard failed.
#[derive(Debug, Error)]
pub enum ClipboardError {
	#[error("no clipboard command is configured for this platform")]
	NotConfigured,

	#[error(transparent)]
	Command(#[from] CommandError),

	#[error("clipboard unavailable: {0}")]
	Unavailable(String),
}

/// Injecting the paste keystroke failed.
#[derive(Debug, Error)]
pub enum PasteError {
	#[error("no paste command is configured for this platform")]
	NotConfigured,

	#[error(transparent)]
	Command(#[from] CommandError),

	#[error("paste trigger unavailable: {0}")]
	Unavailable(String),
}

/// The literal token matcher for a template could not be built.
#[derive(Debug, Error)]
pub enum TemplateError {
	#[error("failed to build placeholder matcher: {0}")]
	Pattern(#[from] regex::Error),
}
