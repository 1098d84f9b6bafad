use anyhow::Result;
use chrono::{DateTime, Days, NaiveDate, Utc};
use promptdeck::dispatch::DispatchOutcome;
use promptdeck::frecency::UsageRecord;
use promptdeck::search::{MatchField, SearchResult};
use promptdeck::template::ValidationErrors;
use promptdeck::types::{HighlightRange, segments, truncate_with_highlight};
use promptdeck::{Prompt, PromptId};
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use super::OutputFormat;

/// Window used for the "recent" column of the stats table.
const RECENT_DAYS: u64 = 7;

/// Widest prompt name printed before it is cut with an ellipsis.
const NAME_COLUMN_MAX: usize = 48;

/// One row of the usage table. `name` is `None` when the prompt is no
/// longer part of the corpus.
pub(crate) struct StatsRow {
	pub(crate) id: PromptId,
	pub(crate) name: Option<String>,
	pub(crate) record: UsageRecord,
}

/// Wrap highlighted runs of `text` in square brackets.
fn bracketed(text: &str, ranges: &[HighlightRange]) -> String {
	segments(text, ranges)
		.into_iter()
		.map(|segment| {
			if segment.highlighted {
				format!("[{}]", segment.text)
			} else {
				segment.text
			}
		})
		.collect()
}

fn pad(text: &str, width: usize) -> String {
	let fill = width.saturating_sub(text.width());
	format!("{text}{}", " ".repeat(fill))
}

fn field_label(field: &MatchField) -> String {
	match field {
		MatchField::Name => "name".to_string(),
		MatchField::Tag(tag) => format!("tag `{tag}`"),
		MatchField::Description => "description".to_string(),
		MatchField::Content => "content".to_string(),
	}
}

fn field_key(field: Option<&MatchField>) -> Option<&'static str> {
	field.map(|field| match field {
		MatchField::Name => "name",
		MatchField::Tag(_) => "tag",
		MatchField::Description => "description",
		MatchField::Content => "content",
	})
}

/// Plain-text table of ranked results, one prompt per line.
pub(crate) fn format_results_plain(results: &[SearchResult]) -> String {
	if results.is_empty() {
		return "No matching prompts\n".to_string();
	}

	let names: Vec<String> = results
		.iter()
		.map(|result| {
			let highlights: &[HighlightRange] = match result.field {
				Some(MatchField::Name) => result.highlights.as_slice(),
				_ => &[],
			};
			let (name, ranges) =
				truncate_with_highlight(&result.prompt.name, highlights, NAME_COLUMN_MAX);
			bracketed(&name, &ranges)
		})
		.collect();
	let name_width = names.iter().map(|name| name.width()).max().unwrap_or(0);

	let mut out = String::new();
	for (position, (result, name)) in results.iter().zip(&names).enumerate() {
		let mut line = format!(
			"{:>3}. {}  {:.3}",
			position + 1,
			pad(name, name_width),
			result.score
		);
		if let Some(folder) = result.prompt.folder_segment() {
			line.push_str(&format!("  {folder}/"));
		}
		match &result.field {
			Some(field @ MatchField::Tag(tag)) => line.push_str(&format!(
				"  via {}: {}",
				field_label(field),
				bracketed(tag, &result.highlights)
			)),
			Some(field @ (MatchField::Description | MatchField::Content)) => {
				line.push_str(&format!("  via {}", field_label(field)));
			}
			Some(MatchField::Name) | None => {}
		}
		out.push_str(line.trim_end());
		out.push('\n');
	}
	out
}

pub(crate) fn format_results_json(query: &str, results: &[SearchResult]) -> Result<String> {
	let rows: Vec<_> = results
		.iter()
		.map(|result| {
			json!({
				"id": result.prompt.id,
				"name": result.prompt.name,
				"folder": result.prompt.folder_segment(),
				"score": result.score,
				"field": field_key(result.field.as_ref()),
				"highlights": result.highlights,
			})
		})
		.collect();

	let payload = json!({
		"query": query,
		"results": rows,
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

pub(crate) fn print_results(format: OutputFormat, query: &str, results: &[SearchResult]) -> Result<()> {
	match format {
		OutputFormat::Plain => print!("{}", format_results_plain(results)),
		OutputFormat::Json => println!("{}", format_results_json(query, results)?),
	}
	Ok(())
}

pub(crate) fn format_outcome_json(prompt: &Prompt, outcome: &DispatchOutcome) -> Result<String> {
	let payload = json!({
		"prompt": { "id": prompt.id, "name": prompt.name },
		"outcome": outcome,
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the result of a dispatch.
pub(crate) fn print_outcome(format: OutputFormat, prompt: &Prompt, outcome: &DispatchOutcome) -> Result<()> {
	match format {
		OutputFormat::Plain => println!("{}: {}", prompt.name, outcome.message),
		OutputFormat::Json => println!("{}", format_outcome_json(prompt, outcome)?),
	}
	Ok(())
}

pub(crate) fn format_validation_plain(prompt: &Prompt, errors: &ValidationErrors) -> String {
	let mut out = format!("{} needs valid values:\n", prompt.name);
	for (name, message) in errors.iter() {
		out.push_str(&format!("  --var {name}=...  {message}\n"));
	}
	out
}

/// Report the variables that failed validation. Plain output goes to stderr
/// so that scripts only ever see rendered results on stdout.
pub(crate) fn print_validation_errors(
	format: OutputFormat,
	prompt: &Prompt,
	errors: &ValidationErrors,
) -> Result<()> {
	match format {
		OutputFormat::Plain => eprint!("{}", format_validation_plain(prompt, errors)),
		OutputFormat::Json => {
			let payload = json!({
				"prompt": { "id": prompt.id, "name": prompt.name },
				"errors": errors,
			});
			println!("{}", serde_json::to_string_pretty(&payload)?);
		}
	}
	Ok(())
}

fn recent_since(now: DateTime<Utc>) -> NaiveDate {
	let today = now.date_naive();
	today
		.checked_sub_days(Days::new(RECENT_DAYS - 1))
		.unwrap_or(today)
}

pub(crate) fn format_stats_plain(rows: &[StatsRow], now: DateTime<Utc>) -> String {
	if rows.is_empty() {
		return "No prompt has been used yet\n".to_string();
	}

	let since = recent_since(now);
	let labels: Vec<String> = rows
		.iter()
		.map(|row| match &row.name {
			Some(name) => name.clone(),
			None => format!("{} (removed)", row.id),
		})
		.collect();
	let width = labels.iter().map(|label| label.width()).max().unwrap_or(0);

	let mut out = String::new();
	for (row, label) in rows.iter().zip(&labels) {
		out.push_str(&format!(
			"{}  {:>5} uses  {:>3} this week  last {}\n",
			pad(label, width),
			row.record.use_count,
			row.record.uses_since(since),
			row.record.last_used.format("%Y-%m-%d %H:%M")
		));
	}
	out
}

pub(crate) fn format_stats_json(rows: &[StatsRow], now: DateTime<Utc>) -> Result<String> {
	let since = recent_since(now);
	let rows: Vec<_> = rows
		.iter()
		.map(|row| {
			json!({
				"id": row.id,
				"name": row.name,
				"use_count": row.record.use_count,
				"last_used": row.record.last_used,
				"recent_uses": row.record.uses_since(since),
			})
		})
		.collect();
	Ok(serde_json::to_string_pretty(&rows)?)
}

pub(crate) fn print_stats(format: OutputFormat, rows: &[StatsRow], now: DateTime<Utc>) -> Result<()> {
	match format {
		OutputFormat::Plain => print!("{}", format_stats_plain(rows, now)),
		OutputFormat::Json => println!("{}", format_stats_json(rows, now)?),
	}
	Ok(())
}
