use anyhow::{Context, Result};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::build_config;
use crate::cli::CliArgs;

/// Resolve the effective settings for one run.
///
/// Config files are read first, `PROMPTDECK__*` variables override them and
/// command-line flags win over both. The merged layers are checked into a
/// [`ResolvedConfig`] before anything touches the corpus or usage file.
pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let mut raw: RawConfig = build_config(cli)?
		.try_deserialize()
		.context("settings do not match the expected sections")?;
	raw.apply_cli_overrides(cli);
	raw.resolve(cli)
}
