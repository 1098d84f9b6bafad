mod args;
mod output;

pub(crate) use args::{CliArgs, CliCommand, OutputFormat, parse_cli};
pub(crate) use output::{StatsRow, print_outcome, print_results, print_stats, print_validation_errors};
