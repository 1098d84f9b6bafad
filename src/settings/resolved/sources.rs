use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Where each explicitly set key came from.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	sources: HashMap<&'static str, SettingSource>,
}

impl ConfigSources {
	pub(crate) fn insert(&mut self, key: &'static str, source: SettingSource) {
		self.sources.insert(key, source);
	}

	/// Origin of `key`, assuming a configuration file when it was not tracked.
	pub(crate) fn source_for(&self, key: &'static str) -> SettingSource {
		self.sources
			.get(key)
			.cloned()
			.unwrap_or(SettingSource::ConfigKey(key))
	}
}
