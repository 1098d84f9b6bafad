use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable opaque identifier of a prompt in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Return the parent folder segment when the id is path-like
	/// (`writing/reply.md` yields `writing`).
	#[must_use]
	pub fn folder(&self) -> Option<&str> {
		Path::new(&self.0)
			.parent()
			.and_then(Path::file_name)
			.and_then(|segment| segment.to_str())
	}
}

impl From<String> for PromptId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for PromptId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl fmt::Display for PromptId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Declaration of a `{{name}}` placeholder inside a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableSpec {
	pub name: String,
	pub default: Option<String>,
	pub required: bool,
	/// Regular expression the resolved value must satisfy.
	pub pattern: Option<String>,
}

impl VariableSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_default(mut self, value: impl Into<String>) -> Self {
		self.default = Some(value.into());
		self
	}

	#[must_use]
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	#[must_use]
	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	/// Literal placeholder token for this variable.
	#[must_use]
	pub fn token(&self) -> String {
		format!("{{{{{}}}}}", self.name)
	}
}

/// A saved text template. The corpus owns these; the pipeline only reads
/// immutable snapshots of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
	pub id: PromptId,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub folder: String,
	#[serde(default)]
	pub tags: BTreeSet<String>,
	#[serde(default)]
	pub variables: Vec<VariableSpec>,
	#[serde(default)]
	pub auto_paste: bool,
	#[serde(default)]
	pub is_favorite: bool,
	#[serde(default, deserialize_with = "blank_as_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default, deserialize_with = "blank_as_none")]
	pub updated_at: Option<DateTime<Utc>>,
}

/// Authoring tools write `""` for timestamps they never set.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<String>::deserialize(deserializer)? {
		Some(raw) if !raw.trim().is_empty() => DateTime::parse_from_rfc3339(raw.trim())
			.map(|stamp| Some(stamp.with_timezone(&Utc)))
			.map_err(serde::de::Error::custom),
		_ => Ok(None),
	}
}

impl Prompt {
	/// Build a prompt with the given id and name and everything else empty.
	pub fn new(id: impl Into<PromptId>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			description: String::new(),
			content: String::new(),
			folder: String::new(),
			tags: BTreeSet::new(),
			variables: Vec::new(),
			auto_paste: false,
			is_favorite: false,
			created_at: None,
			updated_at: None,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self
	}

	#[must_use]
	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags = tags.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_variable(mut self, variable: VariableSpec) -> Self {
		self.variables.push(variable);
		self
	}

	#[must_use]
	pub fn with_auto_paste(mut self, enabled: bool) -> Self {
		self.auto_paste = enabled;
		self
	}

	#[must_use]
	pub fn has_variables(&self) -> bool {
		!self.variables.is_empty()
	}

	/// Folder segment for display: the explicit `folder` field, falling back
	/// to the parent segment of a path-like id.
	#[must_use]
	pub fn folder_segment(&self) -> Option<&str> {
		if self.folder.is_empty() {
			self.id.folder()
		} else {
			Some(&self.folder)
		}
	}

	/// Name and content must both carry text.
	pub fn validate(&self) -> Result<(), &'static str> {
		if self.name.trim().is_empty() {
			return Err("prompt name cannot be empty");
		}
		if self.content.trim().is_empty() {
			return Err("prompt content cannot be empty");
		}
		Ok(())
	}
}
