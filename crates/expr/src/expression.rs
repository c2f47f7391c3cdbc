use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Variables bound on top of the host scope while evaluating an expression.
///
/// The typeahead binds the item variable and `$viewValue` here; formatters
/// see `$model`.
pub type Locals = Map<String, Value>;

/// An opaque, host-evaluated expression.
///
/// The typeahead core never looks inside; it only hands expressions back to
/// the host together with a set of [`Locals`]. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Expression(Arc<str>);

impl Expression {
	/// Wraps expression source text.
	pub fn new(source: impl AsRef<str>) -> Self {
		Self(Arc::from(source.as_ref().trim()))
	}

	/// Returns the expression source text.
	pub fn source(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Expression({:?})", &*self.0)
	}
}

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Expression {
	fn from(source: &str) -> Self {
		Self::new(source)
	}
}
