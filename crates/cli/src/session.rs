//! Line protocol for the `suggest` binary.
//!
//! Plain lines are input text. Lines starting with `:` are commands:
//!
//! | line | effect |
//! |---|---|
//! | `:down` | next match |
//! | `:up` | previous match |
//! | `:enter [n]` | select the active match, or match `n` |
//! | `:esc` | close the popup |
//! | `:quit` | exit |

use std::fmt::Write as _;

use suggest_typeahead::{QueryState, TypeaheadController};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// New input text.
	Input(String),
	/// Activate the next match.
	Next,
	/// Activate the previous match.
	Prev,
	/// Select the active match, or the given index.
	Select(Option<usize>),
	/// Close the popup.
	Dismiss,
	/// Stop reading input.
	Quit,
}

impl Command {
	/// Parses a line. Unknown commands are reported as errors.
	pub fn parse(line: &str) -> Result<Self, String> {
		let Some(command) = line.strip_prefix(':') else {
			return Ok(Self::Input(line.to_string()));
		};
		let mut parts = command.split_whitespace();
		match (parts.next(), parts.next()) {
			(Some("down"), None) => Ok(Self::Next),
			(Some("up"), None) => Ok(Self::Prev),
			(Some("enter"), None) => Ok(Self::Select(None)),
			(Some("enter"), Some(index)) => index
				.parse()
				.map(|i| Self::Select(Some(i)))
				.map_err(|_| format!("invalid match index '{index}'")),
			(Some("esc"), None) => Ok(Self::Dismiss),
			(Some("quit"), None) => Ok(Self::Quit),
			_ => Err(format!("unknown command ':{command}'")),
		}
	}
}

/// Renders the popup: one line per match, the active one marked with `>`.
pub fn render(state: &QueryState) -> String {
	if !state.is_open() {
		return "(no matches)\n".to_string();
	}
	let query = state.query().unwrap_or_default();
	let mut out = String::new();
	for (index, m) in state.matches().iter().enumerate() {
		let marker = if state.is_active(index) { '>' } else { ' ' };
		let _ = writeln!(out, "{marker} {index}: {}", m.highlighted(query));
	}
	out
}

/// Applies `command` and returns what to print, or `None` to quit.
pub async fn apply(ctrl: &mut TypeaheadController, command: Command) -> Option<String> {
	match command {
		Command::Input(text) => {
			let model = ctrl.on_input(&text);
			ctrl.settle().await;
			let mut out = render(ctrl.state());
			if model.is_none() {
				out.push_str("(free text not accepted)\n");
			}
			Some(out)
		}
		Command::Next => {
			ctrl.next_match();
			Some(render(ctrl.state()))
		}
		Command::Prev => {
			ctrl.prev_match();
			Some(render(ctrl.state()))
		}
		Command::Select(index) => Some(match ctrl.select_active(index) {
			Some(selected) => format!(
				"selected {} (shown as {})\n",
				selected.model,
				ctrl.format_model(&selected.model)
			),
			None => "nothing to select\n".to_string(),
		}),
		Command::Dismiss => {
			ctrl.dismiss();
			Some(render(ctrl.state()))
		}
		Command::Quit => None,
	}
}

#[cfg(test)]
mod tests;
