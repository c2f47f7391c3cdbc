//! Typeahead behaviour options.
//!
//! Options are plain data and can be built in code or loaded from TOML:
//!
//! ```toml
//! min-length = 2
//! wait-ms = 150
//! auto-highlight = true
//! editable = false
//! append-to-body = false
//! staleness = "value"
//! input-formatter = "$model.name"
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// How the controller decides whether an async result is still current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Staleness {
	/// A result is current when its input text equals the latest input text.
	///
	/// Two identical inputs issued at different times are indistinguishable,
	/// so a slow response for an earlier "ab" is accepted if the latest input
	/// is also "ab".
	#[default]
	Value,
	/// A result is current only when it belongs to the latest request.
	Sequence,
}

/// Options controlling a [`TypeaheadController`](crate::TypeaheadController).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TypeaheadOptions {
	/// Minimum input length before a lookup starts. Values below 1 act as 1.
	pub min_length: usize,
	/// Quiet period after the last input before a lookup starts, in milliseconds.
	pub wait_ms: u64,
	/// Highlight the first match whenever a new match list arrives.
	pub auto_highlight: bool,
	/// Accept free text as the model value, not only selected matches.
	pub editable: bool,
	/// The popup is positioned relative to the document instead of the input's parent.
	pub append_to_body: bool,
	/// Staleness policy for async results.
	pub staleness: Staleness,
	/// Expression formatting a model value for display in the input.
	pub input_formatter: Option<String>,
}

impl Default for TypeaheadOptions {
	fn default() -> Self {
		Self {
			min_length: 1,
			wait_ms: 0,
			auto_highlight: true,
			editable: true,
			append_to_body: false,
			staleness: Staleness::Value,
			input_formatter: None,
		}
	}
}

impl TypeaheadOptions {
	/// Parses options from a TOML string.
	pub fn from_toml(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Loads options from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&input)
	}

	/// Debounce wait as a [`Duration`].
	pub fn wait(&self) -> Duration {
		Duration::from_millis(self.wait_ms)
	}

	/// Effective minimum input length.
	///
	/// Input length is counted in `char`s (Unicode scalar values), so `"é"`
	/// is one character regardless of its UTF-8 or UTF-16 width.
	pub fn effective_min_length(&self) -> usize {
		self.min_length.max(1)
	}
}
