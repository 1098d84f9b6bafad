use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use super::event::{Direction, Effect, Event};
use super::state::{Phase, SelectionState};
use crate::dispatch::{DispatchOutcome, DispatchRequest};
use crate::template::TemplateRenderer;
use crate::types::Prompt;

/// Move `index` one step in `direction` over `len` items, wrapping at both
/// ends. `None` when there is nothing to select.
#[must_use]
pub fn wrap_index(index: usize, len: usize, direction: Direction) -> Option<usize> {
	let last = len.checked_sub(1)?;
	let index = index.min(last);
	Some(match direction {
		Direction::Down if index == last => 0,
		Direction::Down => index + 1,
		Direction::Up if index == 0 => last,
		Direction::Up => index - 1,
	})
}

/// Apply one event. Pure apart from debug logging of ignored events.
#[must_use]
pub fn transition(mut state: SelectionState, event: Event) -> (SelectionState, Vec<Effect>) {
	let mut effects = Vec::new();
	let phase = mem::take(&mut state.phase);

	state.phase = match (phase, event) {
		(phase @ (Phase::Browsing | Phase::Dispatching { .. }), Event::QueryChanged(text)) => {
			state.query.clone_from(&text);
			effects.push(Effect::ScheduleRank(text));
			phase
		}
		(phase, Event::ResultsRanked { query, results }) => {
			if query == state.query {
				state.replace_results(results);
			} else {
				tracing::debug!(stale = %query, current = %state.query, "dropping stale results");
			}
			phase
		}
		(Phase::Browsing, Event::Navigate(direction)) => {
			state.selected = state
				.selected
				.and_then(|index| wrap_index(index, state.results.len(), direction));
			Phase::Browsing
		}
		(Phase::Browsing, Event::Confirm) => match state.selected().map(|r| Arc::clone(&r.prompt)) {
			Some(prompt) => {
				if prompt.has_variables() {
					Phase::CollectingVariables {
						prompt,
						errors: Default::default(),
					}
				} else {
					begin_dispatch(&mut state, prompt, &HashMap::new(), &mut effects)
				}
			}
			None => Phase::Browsing,
		},
		(Phase::Browsing, Event::Cancel) => {
			effects.push(Effect::Dismiss);
			Phase::Browsing
		}
		(Phase::CollectingVariables { .. }, Event::Cancel) => Phase::Browsing,
		(Phase::CollectingVariables { prompt, .. }, Event::SubmitVariables(values)) => {
			begin_dispatch(&mut state, prompt, &values, &mut effects)
		}
		(Phase::Dispatching { prompt }, Event::DispatchSettled(outcome)) => {
			effects.push(Effect::Notify(outcome.notification(&prompt.name)));
			state.last_outcome = Some(outcome);
			Phase::Browsing
		}
		(phase, event) => {
			tracing::debug!(phase = phase.name(), ?event, "ignoring event");
			phase
		}
	};

	(state, effects)
}

/// Render `prompt` with `values` and move to dispatching, or back to
/// collecting variables when validation fails.
fn begin_dispatch(
	state: &mut SelectionState,
	prompt: Arc<Prompt>,
	values: &HashMap<String, String>,
	effects: &mut Vec<Effect>,
) -> Phase {
	let renderer = match TemplateRenderer::new(&prompt.variables) {
		Ok(renderer) => renderer,
		Err(err) => {
			tracing::warn!(prompt = %prompt.id, error = %err, "cannot render prompt");
			let outcome = DispatchOutcome::internal_failure(err);
			effects.push(Effect::Notify(outcome.notification(&prompt.name)));
			state.last_outcome = Some(outcome);
			return Phase::Browsing;
		}
	};

	match renderer.render(&prompt.content, values) {
		Ok(rendered) => {
			effects.push(Effect::Dispatch(DispatchRequest::new(
				Arc::clone(&prompt),
				rendered,
			)));
			Phase::Dispatching { prompt }
		}
		Err(errors) => Phase::CollectingVariables { prompt, errors },
	}
}
