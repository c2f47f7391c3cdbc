//! Match list and active-selection state.

use serde_json::Value;

use crate::highlight;
use crate::host::PopupPosition;
use crate::options::Staleness;

/// One suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
	/// What the popup shows.
	pub label: Value,
	/// What gets committed when this match is selected.
	pub model: Value,
	/// The collection element the match was built from.
	pub item: Value,
}

impl Match {
	/// The label as display text.
	///
	/// Strings are used as-is; other values use their JSON rendering.
	pub fn label_text(&self) -> String {
		match &self.label {
			Value::String(s) => s.clone(),
			Value::Null => String::new(),
			other => other.to_string(),
		}
	}

	/// The label with every occurrence of `query` wrapped in `<strong>`.
	pub fn highlighted(&self, query: &str) -> String {
		highlight::highlight(&self.label_text(), query)
	}
}

/// Identity of an issued query or lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
	/// The text the request was issued for.
	pub value: String,
	/// Monotonic request number.
	pub seq: u64,
}

impl QueryToken {
	/// Whether `other` refers to the same request under `policy`.
	pub fn matches(&self, other: &QueryToken, policy: Staleness) -> bool {
		match policy {
			Staleness::Value => self.value == other.value,
			Staleness::Sequence => self.seq == other.seq && self.value == other.value,
		}
	}
}

/// Where the selection state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No matches.
	Closed,
	/// Matches shown, one of them active.
	Open {
		/// Index of the active match.
		active: usize,
	},
	/// Matches shown, none active.
	OpenUnselected,
}

/// Controller state read by renderers.
///
/// `active` is `None` or a valid index into `matches`; every replacement of
/// `matches` also sets `active`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
	pub(crate) current_query: Option<QueryToken>,
	pub(crate) last_lookup: Option<QueryToken>,
	matches: Vec<Match>,
	active: Option<usize>,
	query: Option<String>,
	position: Option<PopupPosition>,
	loading: bool,
}

impl QueryState {
	/// Current matches, in collection order.
	pub fn matches(&self) -> &[Match] {
		&self.matches
	}

	/// Index of the active match.
	pub fn active(&self) -> Option<usize> {
		self.active
	}

	/// Active index with `-1` for "none".
	pub fn active_index(&self) -> isize {
		self.active
			.and_then(|i| isize::try_from(i).ok())
			.unwrap_or(-1)
	}

	/// The active match.
	pub fn active_match(&self) -> Option<&Match> {
		self.active.and_then(|i| self.matches.get(i))
	}

	/// The lookup text the current matches were produced for.
	pub fn query(&self) -> Option<&str> {
		self.query.as_deref()
	}

	/// Popup position computed with the current matches.
	pub fn position(&self) -> Option<PopupPosition> {
		self.position
	}

	/// Whether a lookup is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// Whether the popup has anything to show.
	pub fn is_open(&self) -> bool {
		!self.matches.is_empty()
	}

	/// Whether `index` is the active match.
	pub fn is_active(&self, index: usize) -> bool {
		self.active == Some(index)
	}

	/// The state machine phase.
	pub fn phase(&self) -> Phase {
		match (self.matches.is_empty(), self.active) {
			(true, _) => Phase::Closed,
			(false, Some(active)) => Phase::Open { active },
			(false, None) => Phase::OpenUnselected,
		}
	}

	/// The token of the latest accepted query, if any.
	pub fn current_query(&self) -> Option<&QueryToken> {
		self.current_query.as_ref()
	}

	/// The token of the latest issued lookup, if any.
	pub fn last_lookup(&self) -> Option<&QueryToken> {
		self.last_lookup.as_ref()
	}

	/// Clears matches, selection and tokens, and drops the loading flag.
	pub(crate) fn reset(&mut self) {
		self.current_query = None;
		self.last_lookup = None;
		self.matches.clear();
		self.active = None;
		self.query = None;
		self.position = None;
		self.loading = false;
	}

	pub(crate) fn set_loading(&mut self, loading: bool) {
		self.loading = loading;
	}

	/// Replaces the match list in one step.
	pub(crate) fn replace_matches(
		&mut self,
		matches: Vec<Match>,
		auto_highlight: bool,
		query: String,
		position: Option<PopupPosition>,
	) {
		self.active = (auto_highlight && !matches.is_empty()).then_some(0);
		self.matches = matches;
		self.query = Some(query);
		self.position = position;
	}

	/// Moves the active index forward, wrapping from last to first.
	pub fn next_match(&mut self) {
		let len = self.matches.len();
		if len == 0 {
			return;
		}
		self.active = Some(self.active.map_or(0, |i| (i + 1) % len));
	}

	/// Moves the active index back, wrapping from first to last.
	pub fn prev_match(&mut self) {
		let len = self.matches.len();
		if len == 0 {
			return;
		}
		self.active = Some(match self.active {
			Some(0) | None => len - 1,
			Some(i) => i - 1,
		});
	}

	/// Activates `index` if it is in range. Returns whether it was.
	pub fn set_active(&mut self, index: usize) -> bool {
		if index < self.matches.len() {
			self.active = Some(index);
			true
		} else {
			false
		}
	}
}

#[cfg(test)]
mod tests;
