use frizbee::Config;

use super::{ALIGNMENT_MAX_LEN, PREFILTER_ENABLE_THRESHOLD};

/// Builds alignment options for a corpus of `dataset_len` prompts.
///
/// Typos are never allowed: every query character has to be present in the
/// candidate, in order. Large corpora additionally enable the prefilter.
pub(crate) fn config_for_corpus(dataset_len: usize) -> Config {
	let mut config = Config {
		prefilter: false,
		..Config::default()
	};

	config.prefilter = dataset_len >= PREFILTER_ENABLE_THRESHOLD;
	config.max_typos = Some(0);
	config.sort = false;

	config
}

/// Whether the alignment engine should be consulted for this pair. Longer or
/// non-ASCII candidates go through the character-level scan only, which keeps
/// highlight positions in character units.
pub(crate) fn should_align(query: &str, candidate: &str) -> bool {
	candidate.len() <= ALIGNMENT_MAX_LEN && query.is_ascii() && candidate.is_ascii()
}
