mod cli;
mod settings;
mod workflow;

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use cli::{
	CliArgs, CliCommand, OutputFormat, parse_cli, print_outcome, print_results, print_stats,
	print_validation_errors,
};
use promptdeck::logging;
use settings::ResolvedConfig;
use workflow::{PromptWorkflow, UseOutcome};

fn main() -> Result<()> {
	let cli = parse_cli();
	logging::initialize(cli.verbose);

	let resolved = settings::load(&cli).context("failed to load configuration")?;

	if cli.print_config {
		resolved.print_summary();
	}

	run(cli, resolved)
}

/// Execute the requested command and print output in the chosen format.
fn run(cli: CliArgs, settings: ResolvedConfig) -> Result<()> {
	let format = cli.output;
	match cli.command {
		None if cli.print_config => Ok(()),
		None => run_search(format, settings, ""),
		Some(CliCommand::Search { query, .. }) => {
			run_search(format, settings, query.as_deref().unwrap_or_default())
		}
		Some(CliCommand::Use {
			query,
			vars,
			copy_only,
		}) => run_use(format, settings, &query, vars, copy_only),
		Some(CliCommand::Stats { .. }) => {
			let workflow = PromptWorkflow::from_config(settings, true)?;
			print_stats(format, &workflow.stats()?, Utc::now())
		}
	}
}

fn run_search(format: OutputFormat, settings: ResolvedConfig, query: &str) -> Result<()> {
	let mut workflow = PromptWorkflow::from_config(settings, true)?;
	let results = workflow.search(query);
	print_results(format, query, results)
}

fn run_use(
	format: OutputFormat,
	settings: ResolvedConfig,
	query: &str,
	vars: Vec<(String, String)>,
	copy_only: bool,
) -> Result<()> {
	let mut workflow = PromptWorkflow::from_config(settings, copy_only)?;
	let values: HashMap<String, String> = vars.into_iter().collect();

	match workflow.use_prompt(query, values) {
		UseOutcome::Dispatched { prompt, outcome } => {
			print_outcome(format, &prompt, &outcome)?;
			if !outcome.clipboard_success {
				bail!("{} was not copied", prompt.name);
			}
			Ok(())
		}
		UseOutcome::Invalid { prompt, errors } => {
			print_validation_errors(format, &prompt, &errors)?;
			bail!("{} has {} invalid variable(s)", prompt.name, errors.len());
		}
		UseOutcome::NoMatch => bail!("no prompt matches `{query}`"),
	}
}
