//! `{{name}}` placeholder substitution and variable validation.
//!
//! Substitution is a single pass over the content: values are inserted
//! verbatim and never rescanned, so a value containing `{{other}}` stays as
//! typed.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::TemplateError;
use crate::types::VariableSpec;

/// Field-scoped validation failures, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
	}

	fn insert(&mut self, field: &str, message: String) {
		self.0.entry(field.to_string()).or_insert(message);
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (index, (field, message)) in self.iter().enumerate() {
			if index > 0 {
				f.write_str("; ")?;
			}
			write!(f, "{field}: {message}")?;
		}
		Ok(())
	}
}

#[derive(Debug)]
struct CompiledVariable {
	spec: VariableSpec,
	pattern: Option<Result<Regex, String>>,
}

/// Substitutes and validates the declared variables of one prompt.
#[derive(Debug)]
pub struct TemplateRenderer {
	variables: Vec<CompiledVariable>,
	tokens: Option<Regex>,
}

impl TemplateRenderer {
	/// Prepare a renderer for `variables`. Names are matched literally;
	/// later declarations of an already declared name are ignored.
	pub fn new(variables: &[VariableSpec]) -> Result<Self, TemplateError> {
		let mut compiled: Vec<CompiledVariable> = Vec::with_capacity(variables.len());
		for spec in variables {
			if spec.name.is_empty() || compiled.iter().any(|c| c.spec.name == spec.name) {
				continue;
			}
			let pattern = spec.pattern.as_deref().map(|pattern| {
				Regex::new(pattern).map_err(|err| format!("invalid validation pattern: {err}"))
			});
			compiled.push(CompiledVariable {
				spec: spec.clone(),
				pattern,
			});
		}

		let tokens = if compiled.is_empty() {
			None
		} else {
			let names: Vec<String> = compiled
				.iter()
				.map(|variable| regex::escape(&variable.spec.name))
				.collect();
			Some(Regex::new(&format!(r"\{{\{{({})\}}\}}", names.join("|")))?)
		};

		Ok(Self {
			variables: compiled,
			tokens,
		})
	}

	/// Replace each declared token with its supplied value, or the declared
	/// default. Tokens with neither are left in place.
	#[must_use]
	pub fn substitute(&self, content: &str, values: &HashMap<String, String>) -> String {
		let lookup = |name: &str| -> Option<String> {
			values.get(name).cloned().or_else(|| {
				self.find(name)
					.and_then(|variable| variable.spec.default.clone())
			})
		};
		self.replace(content, lookup)
	}

	/// Every declared variable's effective value: supplied, then default,
	/// then empty.
	#[must_use]
	pub fn resolve(&self, values: &HashMap<String, String>) -> BTreeMap<String, String> {
		self.variables
			.iter()
			.map(|variable| {
				let value = values
					.get(&variable.spec.name)
					.or(variable.spec.default.as_ref())
					.cloned()
					.unwrap_or_default();
				(variable.spec.name.clone(), value)
			})
			.collect()
	}

	/// Check required and pattern constraints against the resolved values.
	#[must_use]
	pub fn validate(&self, values: &HashMap<String, String>) -> ValidationErrors {
		let resolved = self.resolve(values);
		let mut errors = ValidationErrors::default();
		for variable in &self.variables {
			let name = variable.spec.name.as_str();
			let value = resolved.get(name).map(String::as_str).unwrap_or_default();
			if value.trim().is_empty() {
				if variable.spec.required {
					errors.insert(name, format!("{name} is required"));
				}
				continue;
			}
			match &variable.pattern {
				Some(Ok(pattern)) if !pattern.is_match(value) => {
					errors.insert(name, format!("{name} does not match {}", pattern.as_str()));
				}
				Some(Err(message)) => errors.insert(name, message.clone()),
				_ => {}
			}
		}
		errors
	}

	/// Validate, then substitute every declared variable with its resolved
	/// value.
	pub fn render(
		&self,
		content: &str,
		values: &HashMap<String, String>,
	) -> Result<String, ValidationErrors> {
		let errors = self.validate(values);
		if !errors.is_empty() {
			return Err(errors);
		}
		let resolved = self.resolve(values);
		Ok(self.replace(content, |name| resolved.get(name).cloned()))
	}

	fn find(&self, name: &str) -> Option<&CompiledVariable> {
		self.variables.iter().find(|variable| variable.spec.name == name)
	}

	fn replace(&self, content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
		let Some(tokens) = &self.tokens else {
			return content.to_string();
		};
		tokens
			.replace_all(content, |caps: &Captures<'_>| {
				lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
			})
			.into_owned()
	}
}
