use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser, Subcommand};

use super::options::OutputFormat;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `promptdeck` binary.
#[derive(Parser, Debug)]
#[command(
	name = "promptdeck",
	version,
	long_version = long_version(),
	about = "Find a saved prompt by a few keystrokes, fill it in and paste it",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "PROMPTDECK_CONFIG",
		action = ArgAction::Append,
		global = true,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		long,
		value_name = "PATH",
		global = true,
		help = "JSON prompt corpus to search (default: <data dir>/prompts.json)"
	)]
	pub(crate) corpus: Option<PathBuf>,
	#[arg(
		long = "usage-file",
		value_name = "PATH",
		global = true,
		help = "File holding usage counters (default: <data dir>/usage.json)"
	)]
	pub(crate) usage_file: Option<PathBuf>,
	#[arg(
		short = 'p',
		long = "print-config",
		global = true,
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		global = true,
		help = "Choose how to print results"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		short = 'v',
		long = "verbose",
		action = ArgAction::Count,
		global = true,
		help = "Log more detail to stderr; repeat for debug and trace (default: warnings only)"
	)]
	pub(crate) verbose: u8,
	#[command(subcommand)]
	pub(crate) command: Option<CliCommand>,
}

impl CliArgs {
	/// Result limit given on the command line, if any.
	pub(crate) fn limit(&self) -> Option<usize> {
		match &self.command {
			Some(CliCommand::Search { limit, .. } | CliCommand::Stats { limit }) => *limit,
			_ => None,
		}
	}
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
	/// Rank the corpus for a query and print the results.
	Search {
		#[arg(value_name = "QUERY", help = "Text to match (default: browse by frecency)")]
		query: Option<String>,
		#[arg(short = 'l', long, value_name = "NUM", help = "Maximum number of results")]
		limit: Option<usize>,
	},
	/// Select the best match for a query, render it and copy it.
	Use {
		#[arg(value_name = "QUERY")]
		query: String,
		#[arg(
			long = "var",
			value_name = "NAME=VALUE",
			value_parser = parse_variable,
			action = ArgAction::Append,
			help = "Value for a template variable; repeatable"
		)]
		vars: Vec<(String, String)>,
		#[arg(long = "copy-only", help = "Never trigger the paste keystroke (default: disabled)")]
		copy_only: bool,
	},
	/// Show usage counters, most used first.
	Stats {
		#[arg(short = 'l', long, value_name = "NUM", help = "Maximum number of rows")]
		limit: Option<usize>,
	},
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
	let (name, value) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
	if name.is_empty() {
		return Err(format!("variable name is empty in `{raw}`"));
	}
	Ok((name.to_string(), value.to_string()))
}
