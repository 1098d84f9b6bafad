use super::{ConfigError, ConfigSources, ResolvedConfig};

const MAX_DEBOUNCE_MS: u64 = 5_000;

fn invalid(
	sources: &ConfigSources,
	key: &'static str,
	value: impl ToString,
	reason: &str,
) -> Result<(), ConfigError> {
	Err(ConfigError::invalid(key, value, sources.source_for(key), reason))
}

pub(super) fn validate(config: &ResolvedConfig, sources: &ConfigSources) -> Result<(), ConfigError> {
	if config.search.debounce_ms > MAX_DEBOUNCE_MS {
		return invalid(
			sources,
			"search.debounce_ms",
			config.search.debounce_ms,
			"must be at most 5000 milliseconds",
		);
	}
	if config.search.limit == 0 {
		return invalid(sources, "search.limit", config.search.limit, "must be greater than zero");
	}

	for (key, weight) in [
		("ranking.fuzzy_weight", config.weights.fuzzy),
		("ranking.frecency_weight", config.weights.frecency),
	] {
		if !weight.is_finite() || weight < 0.0 {
			return invalid(sources, key, weight, "must be a finite, non-negative number");
		}
	}
	if config.weights.fuzzy + config.weights.frecency == 0.0 {
		return invalid(
			sources,
			"ranking.fuzzy_weight",
			config.weights.fuzzy,
			"fuzzy and frecency weights cannot both be zero",
		);
	}

	for (key, value) in [
		("frecency.half_life_hours", config.frecency.half_life_hours),
		("frecency.saturation_uses", config.frecency.saturation_uses),
	] {
		if !value.is_finite() || value <= 0.0 {
			return invalid(sources, key, value, "must be greater than zero");
		}
	}
	let floor = config.frecency.recency_floor;
	if !(0.0..=1.0).contains(&floor) {
		return invalid(sources, "frecency.recency_floor", floor, "must be between 0 and 1");
	}

	if config.clipboard.paste_delay_ms > MAX_DEBOUNCE_MS {
		return invalid(
			sources,
			"clipboard.paste_delay_ms",
			config.clipboard.paste_delay_ms,
			"must be at most 5000 milliseconds",
		);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use promptdeck::frecency::FrecencyParams;
	use promptdeck::search::RankingWeights;

	use super::super::{ClipboardSettings, SearchSettings, SettingSource};
	use super::*;

	fn base() -> ResolvedConfig {
		ResolvedConfig {
			corpus_path: PathBuf::from("/tmp/prompts.json"),
			usage_path: PathBuf::from("/tmp/usage.json"),
			search: SearchSettings {
				debounce_ms: 150,
				limit: 2000,
			},
			weights: RankingWeights::default(),
			frecency: FrecencyParams::default(),
			clipboard: ClipboardSettings {
				copy_command: None,
				paste_command: None,
				paste_delay_ms: 100,
			},
		}
	}

	#[test]
	fn defaults_are_valid() {
		validate(&base(), &ConfigSources::default()).expect("valid");
	}

	#[test]
	fn validation_rejects_zero_limit_from_cli() {
		let mut config = base();
		config.search.limit = 0;
		let mut sources = ConfigSources::default();
		sources.insert("search.limit", SettingSource::CliFlag("--limit"));

		let err = validate(&config, &sources).unwrap_err();
		assert_eq!(err.key, "search.limit");
		let message = err.to_string();
		assert!(message.contains("value: 0"));
		assert!(message.contains("CLI flag `--limit`"));
	}

	#[test]
	fn validation_rejects_negative_weights() {
		let mut config = base();
		config.weights.frecency = -0.5;
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "ranking.frecency_weight");
		assert_eq!(err.origin, SettingSource::ConfigKey("ranking.frecency_weight"));
	}

	#[test]
	fn validation_rejects_all_zero_weights() {
		let mut config = base();
		config.weights = RankingWeights {
			fuzzy: 0.0,
			frecency: 0.0,
		};
		assert!(validate(&config, &ConfigSources::default()).is_err());
	}

	#[test]
	fn validation_rejects_out_of_range_frecency_constants() {
		let mut config = base();
		config.frecency.half_life_hours = 0.0;
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "frecency.half_life_hours");

		let mut config = base();
		config.frecency.recency_floor = 1.5;
		let mut sources = ConfigSources::default();
		sources.insert(
			"frecency.recency_floor",
			SettingSource::Environment("PROMPTDECK__FRECENCY__RECENCY_FLOOR"),
		);
		let err = validate(&config, &sources).unwrap_err();
		assert!(err.to_string().contains("environment variable"));
	}

	#[test]
	fn validation_rejects_long_debounce() {
		let mut config = base();
		config.search.debounce_ms = 10_000;
		let err = validate(&config, &ConfigSources::default()).unwrap_err();
		assert_eq!(err.key, "search.debounce_ms");
	}
}
