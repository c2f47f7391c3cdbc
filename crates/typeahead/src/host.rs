//! Collaborators supplied by the embedding application.
//!
//! The controller owns no scope and no DOM. It reaches the outside world
//! only through these seams:
//!
//! - [`Host`] evaluates the parsed sub-expressions against the host's scope.
//! - [`LoadingSink`] receives the "lookup in progress" flag.
//! - [`PositionCalculator`] measures the input the popup is anchored to.
//! - [`ModelSetter`] commits a selected model value.
//!
//! Closures implement the last three, so simple hosts need no new types.

use futures::future::BoxFuture;
use serde_json::Value;
use suggest_expr::{Expression, Locals};

use crate::error::LookupError;

/// Future returned by [`Host::lookup`].
///
/// Synchronous hosts return `futures::future::ready(..).boxed()`; the
/// controller treats both kinds the same way.
pub type LookupFuture = BoxFuture<'static, Result<Vec<Value>, LookupError>>;

/// Evaluates typeahead expressions against a host-owned scope.
pub trait Host: Send + Sync + 'static {
	/// Evaluates a label, model or formatter expression.
	///
	/// Values that cannot be resolved should come back as `Value::Null`.
	fn evaluate(&self, expr: &Expression, locals: &Locals) -> Value;

	/// Resolves the collection expression into candidate items.
	///
	/// `locals` carries `$viewValue`, the text being looked up.
	fn lookup(&self, expr: &Expression, locals: Locals) -> LookupFuture;
}

/// Receives the loading flag at lookup start and end.
pub trait LoadingSink: Send {
	/// Sets the loading flag.
	fn set_loading(&mut self, loading: bool);
}

impl<F> LoadingSink for F
where
	F: FnMut(bool) + Send,
{
	fn set_loading(&mut self, loading: bool) {
		self(loading);
	}
}

/// Commits a selected model value to the host.
pub trait ModelSetter: Send {
	/// Stores `value` as the input's model value.
	fn set_model(&mut self, value: Value);
}

impl<F> ModelSetter for F
where
	F: FnMut(Value) + Send,
{
	fn set_model(&mut self, value: Value) {
		self(value);
	}
}

/// Which coordinate space the anchor rectangle is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
	/// Relative to the input's offset parent.
	Relative,
	/// Relative to the document, for popups appended to the body.
	Offset,
}

/// Rectangle of the element the popup hangs from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorRect {
	/// Distance from the top edge.
	pub top: f64,
	/// Distance from the left edge.
	pub left: f64,
	/// Element width.
	pub width: f64,
	/// Element height.
	pub height: f64,
}

/// Where the popup goes: directly below the anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopupPosition {
	/// Distance from the top edge.
	pub top: f64,
	/// Distance from the left edge.
	pub left: f64,
}

impl From<AnchorRect> for PopupPosition {
	fn from(anchor: AnchorRect) -> Self {
		Self {
			top: anchor.top + anchor.height,
			left: anchor.left,
		}
	}
}

/// Measures the anchor element.
pub trait PositionCalculator: Send {
	/// Returns the anchor rectangle in the requested coordinate space.
	fn anchor(&self, mode: PositionMode) -> AnchorRect;
}

impl<F> PositionCalculator for F
where
	F: Fn(PositionMode) -> AnchorRect + Send,
{
	fn anchor(&self, mode: PositionMode) -> AnchorRect {
		self(mode)
	}
}
