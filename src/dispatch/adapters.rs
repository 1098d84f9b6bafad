//! Clipboard and paste-keystroke adapters.
//!
//! The pipeline only sees the [`Clipboard`] and [`PasteTrigger`] contracts.
//! The command-backed implementations shell out to whatever helper the
//! platform provides (`pbcopy`, `wl-copy`, `xclip`, ...).

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{ClipboardError, CommandError, PasteError};

/// Destination of rendered prompt text.
pub trait Clipboard: Send + Sync {
	fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

	/// Current clipboard text, when the adapter can read it back.
	fn read_text(&self) -> Result<Option<String>, ClipboardError> {
		Ok(None)
	}
}

/// Injects a paste keystroke into whatever application has focus.
///
/// `Ok` only means the keystroke was sent; whether the target application
/// received it cannot be observed.
pub trait PasteTrigger: Send + Sync {
	fn trigger_paste(&self) -> Result<(), PasteError>;
}

/// An external program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
	program: String,
	args: Vec<String>,
}

impl ShellCommand {
	pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			program: program.into(),
			args: args.into_iter().map(Into::into).collect(),
		}
	}

	/// Build from an argv list; `None` when the list is empty.
	#[must_use]
	pub fn from_argv(argv: &[String]) -> Option<Self> {
		let (program, args) = argv.split_first()?;
		Some(Self::new(program.clone(), args.iter().cloned()))
	}

	#[must_use]
	pub fn program(&self) -> &str {
		&self.program
	}

	/// Run the command, feeding `input` on stdin, and return its stdout.
	pub fn run(&self, input: Option<&str>) -> Result<Vec<u8>, CommandError> {
		let mut child = Command::new(&self.program)
			.args(&self.args)
			.stdin(if input.is_some() {
				Stdio::piped()
			} else {
				Stdio::null()
			})
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.spawn()
			.map_err(|source| CommandError::Spawn {
				program: self.program.clone(),
				source,
			})?;

		if let Some(text) = input
			&& let Some(mut stdin) = child.stdin.take()
		{
			stdin
				.write_all(text.as_bytes())
				.map_err(|source| CommandError::Io {
					program: self.program.clone(),
					source,
				})?;
		}

		let output = child.wait_with_output().map_err(|source| CommandError::Io {
			program: self.program.clone(),
			source,
		})?;
		if !output.status.success() {
			return Err(CommandError::Status {
				program: self.program.clone(),
				status: output.status,
			});
		}
		Ok(output.stdout)
	}
}

/// Desktop environments with known clipboard helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
	MacOs,
	Wayland,
	X11,
	Windows,
	Unknown,
}

impl Platform {
	/// Detect the platform of the running process.
	#[must_use]
	pub fn current() -> Self {
		if cfg!(target_os = "macos") {
			Self::MacOs
		} else if cfg!(windows) {
			Self::Windows
		} else if env_is_set("WAYLAND_DISPLAY") {
			Self::Wayland
		} else if env_is_set("DISPLAY") {
			Self::X11
		} else {
			Self::Unknown
		}
	}

	#[must_use]
	pub fn copy_command(self) -> Option<ShellCommand> {
		match self {
			Self::MacOs => Some(ShellCommand::new("pbcopy", Vec::<String>::new())),
			Self::Wayland => Some(ShellCommand::new("wl-copy", Vec::<String>::new())),
			Self::X11 => Some(ShellCommand::new("xclip", ["-selection", "clipboard"])),
			Self::Windows => Some(ShellCommand::new("clip", Vec::<String>::new())),
			Self::Unknown => None,
		}
	}

	#[must_use]
	pub fn read_command(self) -> Option<ShellCommand> {
		match self {
			Self::MacOs => Some(ShellCommand::new("pbpaste", Vec::<String>::new())),
			Self::Wayland => Some(ShellCommand::new("wl-paste", ["--no-newline"])),
			Self::X11 => Some(ShellCommand::new("xclip", ["-selection", "clipboard", "-o"])),
			Self::Windows | Self::Unknown => None,
		}
	}

	#[must_use]
	pub fn paste_command(self) -> Option<ShellCommand> {
		match self {
			Self::MacOs => Some(ShellCommand::new(
				"osascript",
				[
					"-e",
					r#"tell application "System Events" to keystroke "v" using command down"#,
				],
			)),
			Self::Wayland => Some(ShellCommand::new("wtype", ["-M", "ctrl", "v", "-m", "ctrl"])),
			Self::X11 => Some(ShellCommand::new("xdotool", ["key", "--clearmodifiers", "ctrl+v"])),
			Self::Windows | Self::Unknown => None,
		}
	}
}

fn env_is_set(key: &str) -> bool {
	env::var_os(key).is_some_and(|value| !value.is_empty())
}

/// Clipboard backed by external copy (and optional read-back) commands.
#[derive(Debug, Clone, Default)]
pub struct CommandClipboard {
	copy: Option<ShellCommand>,
	read: Option<ShellCommand>,
}

impl CommandClipboard {
	#[must_use]
	pub fn new(copy: Option<ShellCommand>, read: Option<ShellCommand>) -> Self {
		Self { copy, read }
	}

	/// Platform default helpers.
	#[must_use]
	pub fn detect() -> Self {
		let platform = Platform::current();
		Self::new(platform.copy_command(), platform.read_command())
	}
}

impl Clipboard for CommandClipboard {
	fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
		let command = self.copy.as_ref().ok_or(ClipboardError::NotConfigured)?;
		command.run(Some(text))?;
		Ok(())
	}

	fn read_text(&self) -> Result<Option<String>, ClipboardError> {
		let Some(command) = &self.read else {
			return Ok(None);
		};
		let stdout = command.run(None)?;
		String::from_utf8(stdout)
			.map(Some)
			.map_err(|_| {
				ClipboardError::Command(CommandError::Encoding {
					program: command.program().to_string(),
				})
			})
	}
}

/// Paste trigger backed by an external keystroke helper.
#[derive(Debug, Clone, Default)]
pub struct CommandPaste {
	command: Option<ShellCommand>,
}

impl CommandPaste {
	#[must_use]
	pub fn new(command: Option<ShellCommand>) -> Self {
		Self { command }
	}

	#[must_use]
	pub fn detect() -> Self {
		Self::new(Platform::current().paste_command())
	}
}

impl PasteTrigger for CommandPaste {
	fn trigger_paste(&self) -> Result<(), PasteError> {
		let command = self.command.as_ref().ok_or(PasteError::NotConfigured)?;
		command.run(None)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn argv_lists_split_into_program_and_args() {
		let argv = vec!["xclip".to_string(), "-selection".into(), "clipboard".into()];
		let command = ShellCommand::from_argv(&argv).expect("command");
		assert_eq!(command, ShellCommand::new("xclip", ["-selection", "clipboard"]));
		assert!(ShellCommand::from_argv(&[]).is_none());
	}

	#[test]
	fn every_desktop_platform_has_a_copy_helper() {
		for platform in [Platform::MacOs, Platform::Wayland, Platform::X11, Platform::Windows] {
			assert!(platform.copy_command().is_some(), "{platform:?}");
		}
		assert!(Platform::Unknown.copy_command().is_none());
		assert!(Platform::Windows.paste_command().is_none());
	}

	#[test]
	fn unconfigured_adapters_report_errors() {
		let clipboard = CommandClipboard::default();
		assert!(matches!(clipboard.write_text("x"), Err(ClipboardError::NotConfigured)));
		assert!(matches!(clipboard.read_text(), Ok(None)));
		assert!(matches!(
			CommandPaste::default().trigger_paste(),
			Err(PasteError::NotConfigured)
		));
	}

	#[test]
	fn missing_programs_fail_to_spawn() {
		let command = ShellCommand::new("promptdeck-no-such-helper", Vec::<String>::new());
		assert!(matches!(command.run(None), Err(CommandError::Spawn { .. })));
	}

	#[cfg(unix)]
	#[test]
	fn command_clipboard_round_trips_through_helpers() {
		let dir = tempfile::tempdir().expect("tempdir");
		let file = dir.path().join("clip.txt");
		let target = file.display().to_string();
		let script = format!("cat > '{target}'");
		let clipboard = CommandClipboard::new(
			Some(ShellCommand::new("sh", ["-c", script.as_str()])),
			Some(ShellCommand::new("cat", [target.as_str()])),
		);

		clipboard.write_text("Review Go code").expect("write");
		assert_eq!(
			clipboard.read_text().expect("read").as_deref(),
			Some("Review Go code")
		);
	}

	#[cfg(unix)]
	#[test]
	fn failing_helpers_report_their_status() {
		let paste = CommandPaste::new(Some(ShellCommand::new("false", Vec::<String>::new())));
		assert!(matches!(
			paste.trigger_paste(),
			Err(PasteError::Command(CommandError::Status { .. }))
		));
	}
}
