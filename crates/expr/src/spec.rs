//! Typeahead specification strings.
//!
//! A specification describes how to turn a collection into suggestions:
//!
//! ```text
//! model (as label)? for item in collection
//! ```
//!
//! `model` is what gets committed when a suggestion is chosen, `label` is what
//! the popup shows (defaults to `model`), `item` names each collection element
//! while `model` and `label` are evaluated.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SpecError;
use crate::expression::Expression;

static SPEC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^\s*(?P<model>.*?)(?:\s+as\s+(?P<label>.*?))?\s+for\s+(?P<item>[A-Za-z_$][A-Za-z0-9_$]*)\s+in\s+(?P<collection>.*)$",
	)
	.expect("specification pattern is valid")
});

/// A parsed typeahead specification.
///
/// Immutable once parsed; controllers share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionSpec {
	/// Identifier bound to each collection element during evaluation.
	pub item_name: String,
	/// Expression producing the candidate collection.
	pub collection: Expression,
	/// Expression producing the text shown for an element.
	pub label: Expression,
	/// Expression producing the value committed for an element.
	pub model: Expression,
}

impl ExpressionSpec {
	/// Parses a specification string.
	///
	/// When no `as` clause is present the label expression is the model
	/// expression.
	///
	/// # Errors
	///
	/// Returns [`SpecError::InvalidSpecification`] when `input` does not match
	/// the grammar or its model expression is blank.
	pub fn parse(input: &str) -> Result<Self, SpecError> {
		let invalid = || SpecError::InvalidSpecification {
			input: input.to_string(),
		};

		let caps = SPEC_PATTERN.captures(input).ok_or_else(invalid)?;
		let model = caps.name("model").map(|m| m.as_str()).unwrap_or_default();
		if model.trim().is_empty() {
			return Err(invalid());
		}
		let label = caps
			.name("label")
			.map(|m| m.as_str())
			.filter(|l| !l.trim().is_empty())
			.unwrap_or(model);
		let item = caps.name("item").ok_or_else(invalid)?;
		let collection = caps.name("collection").ok_or_else(invalid)?;

		Ok(Self {
			item_name: item.as_str().to_string(),
			collection: Expression::new(collection.as_str()),
			label: Expression::new(label),
			model: Expression::new(model),
		})
	}

	/// Returns true when the label is the model expression itself.
	pub fn label_is_model(&self) -> bool {
		self.label == self.model
	}
}

impl FromStr for ExpressionSpec {
	type Err = SpecError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

#[cfg(test)]
mod tests;
