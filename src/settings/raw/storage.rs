use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use promptdeck::app_dirs;
use serde::Deserialize;

use crate::cli::CliArgs;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct CorpusSection {
	pub(super) path: Option<PathBuf>,
}

impl CorpusSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(path) = cli.corpus.clone() {
			self.path = Some(path);
		}
	}

	pub(super) fn resolve(self) -> Result<PathBuf> {
		match self.path {
			Some(path) => absolutize(path),
			None => app_dirs::default_corpus_path().context("failed to locate the prompt corpus"),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UsageSection {
	pub(super) path: Option<PathBuf>,
}

impl UsageSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(path) = cli.usage_file.clone() {
			self.path = Some(path);
		}
	}

	pub(super) fn resolve(self) -> Result<PathBuf> {
		match self.path {
			Some(path) => absolutize(path),
			None => app_dirs::default_usage_path().context("failed to locate the usage store"),
		}
	}
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
	if path.is_absolute() {
		return Ok(path);
	}
	Ok(env::current_dir()
		.context("failed to resolve current directory")?
		.join(path))
}
