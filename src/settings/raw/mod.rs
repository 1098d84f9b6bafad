use std::env;

use anyhow::{Error, Result};
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::{ConfigSources, ResolvedConfig, SettingSource};

mod clipboard;
mod search;
mod storage;

use clipboard::ClipboardSection;
use search::{FrecencySection, RankingSection, SearchSection};
use storage::{CorpusSection, UsageSection};

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	corpus: CorpusSection,
	usage: UsageSection,
	search: SearchSection,
	ranking: RankingSection,
	frecency: FrecencySection,
	clipboard: ClipboardSection,
}

/// Validated keys: configuration key, environment variable, CLI flag.
const TRACKED_KEYS: &[(&str, &str, Option<&str>)] = &[
	("search.debounce_ms", "PROMPTDECK__SEARCH__DEBOUNCE_MS", None),
	("search.limit", "PROMPTDECK__SEARCH__LIMIT", Some("--limit")),
	("ranking.fuzzy_weight", "PROMPTDECK__RANKING__FUZZY_WEIGHT", None),
	("ranking.frecency_weight", "PROMPTDECK__RANKING__FRECENCY_WEIGHT", None),
	("frecency.half_life_hours", "PROMPTDECK__FRECENCY__HALF_LIFE_HOURS", None),
	("frecency.saturation_uses", "PROMPTDECK__FRECENCY__SATURATION_USES", None),
	("frecency.recency_floor", "PROMPTDECK__FRECENCY__RECENCY_FLOOR", None),
	("clipboard.paste_delay_ms", "PROMPTDECK__CLIPBOARD__PASTE_DELAY_MS", None),
];

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		self.corpus.apply_cli_overrides(cli);
		self.usage.apply_cli_overrides(cli);
		self.search.apply_cli_overrides(cli);
	}

	/// Convert the raw configuration into a [`ResolvedConfig`], validating and
	/// filling defaults where required.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let mut sources = ConfigSources::default();
		for &(key, env_var, flag) in TRACKED_KEYS {
			let cli_present = flag == Some("--limit") && cli.limit().is_some();
			if let Some(source) = detect_source(cli_present, self.is_set(key), env_var, flag, key) {
				sources.insert(key, source);
			}
		}

		let config = ResolvedConfig {
			corpus_path: self.corpus.resolve()?,
			usage_path: self.usage.resolve()?,
			search: self.search.resolve(),
			weights: self.ranking.resolve(),
			frecency: self.frecency.resolve(),
			clipboard: self.clipboard.resolve(),
		};

		config.validate(&sources).map_err(Error::new)?;

		Ok(config)
	}

	fn is_set(&self, key: &str) -> bool {
		match key {
			"search.debounce_ms" => self.search.debounce_ms.is_some(),
			"search.limit" => self.search.limit.is_some(),
			"ranking.fuzzy_weight" => self.ranking.fuzzy_weight.is_some(),
			"ranking.frecency_weight" => self.ranking.frecency_weight.is_some(),
			"frecency.half_life_hours" => self.frecency.half_life_hours.is_some(),
			"frecency.saturation_uses" => self.frecency.saturation_uses.is_some(),
			"frecency.recency_floor" => self.frecency.recency_floor.is_some(),
			"clipboard.paste_delay_ms" => self.clipboard.paste_delay_ms.is_some(),
			_ => false,
		}
	}
}

fn detect_source(
	cli_present: bool,
	value_present: bool,
	env_var: &'static str,
	cli_flag: Option<&'static str>,
	key: &'static str,
) -> Option<SettingSource> {
	if !value_present {
		return None;
	}

	if cli_present && let Some(flag) = cli_flag {
		return Some(SettingSource::CliFlag(flag));
	}

	if env::var_os(env_var).is_some() {
		return Some(SettingSource::Environment(env_var));
	}

	Some(SettingSource::ConfigKey(key))
}
