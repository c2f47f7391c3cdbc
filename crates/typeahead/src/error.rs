//! Error types for lookups and options loading.

use std::path::PathBuf;

use suggest_expr::EvalError;
use thiserror::Error;

/// A failed collection lookup.
///
/// The controller never surfaces these to its caller; a failed lookup is
/// handled exactly like an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
	/// The host's data source failed.
	#[error("lookup failed: {0}")]
	Host(String),

	/// The collection expression evaluated to something that is not a list.
	#[error("collection expression '{0}' did not produce a list")]
	NotACollection(String),

	/// The collection expression could not be compiled.
	#[error("collection expression is invalid: {0}")]
	Eval(#[from] EvalError),
}

/// Errors that can occur when loading typeahead options.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown/mistyped key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading an options file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for options loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
