//! Error types for specification parsing and expression compilation.

use thiserror::Error;

/// Errors raised while parsing a typeahead specification string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
	/// The string does not follow `model (as label)? for item in collection`.
	#[error(
		"expected typeahead specification in form of '_modelValue_ (as _label_)? for _item_ in _collection_' but got '{input}'"
	)]
	InvalidSpecification {
		/// The rejected specification string.
		input: String,
	},
}

/// Errors raised while compiling an expression into a [`Program`](crate::Program).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
	/// A character that starts no token.
	#[error("unexpected character '{ch}' at offset {offset}")]
	UnexpectedChar {
		/// The offending character.
		ch: char,
		/// Byte offset into the source.
		offset: usize,
	},

	/// A string literal without its closing quote.
	#[error("unterminated string literal starting at offset {0}")]
	UnterminatedString(usize),

	/// A numeric literal that does not parse.
	#[error("invalid number literal '{0}'")]
	InvalidNumber(String),

	/// The token stream ended or continued where it should not.
	#[error("unexpected {found} in expression '{source_text}'")]
	UnexpectedToken {
		/// Description of what was found.
		found: String,
		/// The full expression source.
		source_text: String,
	},

	/// A pipe name that the language does not provide.
	#[error("unknown pipe '{0}'")]
	UnknownPipe(String),

	/// The expression source is empty.
	#[error("empty expression")]
	Empty,
}
