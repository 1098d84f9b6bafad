//! Keyboard-driven selection state machine.
//!
//! [`transition`] is a pure `(state, event) -> (state, effects)` function.
//! Whoever owns the event loop performs the returned [`Effect`]s and feeds
//! their results back in as events.

mod event;
mod state;
mod transition;

pub use event::{Direction, Effect, Event};
pub use state::{Phase, SelectionState};
pub use transition::{transition, wrap_index};
