use promptdeck::app_dirs;
use promptdeck::dispatch::ShellCommand;

use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
	println!("Effective configuration:");
	println!("  Corpus: {}", config.corpus_path.display());
	println!("  Usage store: {}", config.usage_path.display());
	if let Ok(dir) = app_dirs::get_cache_dir() {
		println!("  Cache directory: {}", dir.display());
	}
	println!("  Debounce: {} ms", config.search.debounce_ms);
	println!("  Result limit: {}", config.search.limit);
	println!(
		"  Ranking weights: fuzzy {}, frecency {}",
		config.weights.fuzzy, config.weights.frecency
	);
	println!(
		"  Frecency: half life {} h, saturation {} uses, recency floor {}",
		config.frecency.half_life_hours,
		config.frecency.saturation_uses,
		config.frecency.recency_floor
	);
	println!(
		"  Copy command: {}",
		command_label(config.clipboard.copy_command.as_ref())
	);
	println!(
		"  Paste command: {}",
		command_label(config.clipboard.paste_command.as_ref())
	);
	println!("  Paste delay: {} ms", config.clipboard.paste_delay_ms);
}

fn command_label(command: Option<&ShellCommand>) -> &str {
	command.map_or("(detect)", ShellCommand::program)
}
