use promptdeck::frecency::FrecencyParams;
use promptdeck::search::{MAX_RENDERED_RESULTS, RankingWeights};
use serde::Deserialize;

use super::super::resolved::SearchSettings;
use crate::cli::CliArgs;

const DEFAULT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SearchSection {
	pub(super) debounce_ms: Option<u64>,
	pub(super) limit: Option<usize>,
}

impl SearchSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(limit) = cli.limit() {
			self.limit = Some(limit);
		}
	}

	pub(super) fn resolve(self) -> SearchSettings {
		SearchSettings {
			debounce_ms: self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
			limit: self.limit.unwrap_or(MAX_RENDERED_RESULTS),
		}
	}
}

/// Blend weights used for non-empty queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RankingSection {
	pub(super) fuzzy_weight: Option<f64>,
	pub(super) frecency_weight: Option<f64>,
}

impl RankingSection {
	pub(super) fn resolve(self) -> RankingWeights {
		let defaults = RankingWeights::default();
		RankingWeights {
			fuzzy: self.fuzzy_weight.unwrap_or(defaults.fuzzy),
			frecency: self.frecency_weight.unwrap_or(defaults.frecency),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct FrecencySection {
	pub(super) half_life_hours: Option<f64>,
	pub(super) saturation_uses: Option<f64>,
	pub(super) recency_floor: Option<f64>,
}

impl FrecencySection {
	pub(super) fn resolve(self) -> FrecencyParams {
		let defaults = FrecencyParams::default();
		FrecencyParams {
			half_life_hours: self.half_life_hours.unwrap_or(defaults.half_life_hours),
			saturation_uses: self.saturation_uses.unwrap_or(defaults.saturation_uses),
			recency_floor: self.recency_floor.unwrap_or(defaults.recency_floor),
		}
	}
}
