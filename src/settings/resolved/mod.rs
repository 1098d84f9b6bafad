use std::path::PathBuf;
use std::time::Duration;

use promptdeck::frecency::FrecencyParams;
use promptdeck::search::RankingWeights;
use promptdeck::dispatch::ShellCommand;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
	pub debounce_ms: u64,
	pub limit: usize,
}

impl SearchSettings {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardSettings {
	pub copy_command: Option<ShellCommand>,
	pub paste_command: Option<ShellCommand>,
	pub paste_delay_ms: u64,
}

impl ClipboardSettings {
	pub fn paste_delay(&self) -> Duration {
		Duration::from_millis(self.paste_delay_ms)
	}
}

/// Application-ready configuration derived from user input, config files and
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
	pub corpus_path: PathBuf,
	pub usage_path: PathBuf,
	pub search: SearchSettings,
	pub weights: RankingWeights,
	pub frecency: FrecencyParams,
	pub clipboard: ClipboardSettings,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		summary::print_summary(self);
	}
}
