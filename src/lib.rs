//! Core of a keyboard-driven prompt launcher.
//!
//! Type a few characters, get the most relevant saved prompt, fill in its
//! variables and have the result copied (and optionally pasted) into the
//! focused application. The pipeline runs leaves first:
//!
//! - [`search::FuzzyMatcher`] scores a query against one candidate string.
//! - [`frecency::FrecencyTracker`] turns usage counters into a bounded score.
//! - [`search::RankingEngine`] orders a corpus snapshot using both.
//! - [`selection::transition`] drives browsing, variable collection and
//!   dispatch.
//! - [`template::TemplateRenderer`] substitutes `{{name}}` placeholders.
//! - [`dispatch::PasteOrchestrator`] records usage, writes the clipboard and
//!   triggers the paste.
//!
//! [`Launcher`] wires them together for a single-threaded event loop.

pub mod app_dirs;
pub mod corpus;
pub mod dispatch;
pub mod error;
pub mod frecency;
mod launcher;
pub mod logging;
pub mod search;
pub mod selection;
pub mod template;
pub mod types;

pub use launcher::Launcher;
pub use types::{HighlightRange, Prompt, PromptId, VariableSpec};
