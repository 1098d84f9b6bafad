//! Resolve configuration, cache, and data directories for `promptdeck`.
//!
//! Each directory can be overridden through an environment variable; otherwise
//! the platform location from the `directories` crate is used.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "promptdeck";
const APPLICATION: &str = "promptdeck";

pub const CONFIG_DIR_ENV: &str = "PROMPTDECK_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "PROMPTDECK_DATA_DIR";
pub const CACHE_DIR_ENV: &str = "PROMPTDECK_CACHE_DIR";

const CORPUS_FILE: &str = "prompts.json";
const USAGE_FILE: &str = "usage.json";

fn project_dirs() -> Result<ProjectDirs> {
	ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
		.ok_or_else(|| anyhow!("unable to determine project directories for promptdeck"))
}

/// Resolve an override directory from an environment variable. Empty values
/// count as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	let value = env::var_os(name)?;
	if value.is_empty() {
		None
	} else {
		Some(PathBuf::from(value))
	}
}

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Directory holding the prompt corpus and usage counters.
pub fn get_data_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.data_local_dir().to_path_buf())
}

pub fn get_cache_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CACHE_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.cache_dir().to_path_buf())
}

/// Default location of the JSON prompt corpus.
pub fn default_corpus_path() -> Result<PathBuf> {
	Ok(get_data_dir()?.join(CORPUS_FILE))
}

/// Default location of the usage store.
pub fn default_usage_path() -> Result<PathBuf> {
	Ok(get_data_dir()?.join(USAGE_FILE))
}
