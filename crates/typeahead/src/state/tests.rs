use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;

fn matches(n: usize) -> Vec<Match> {
	(0..n)
		.map(|i| Match {
			label: json!(format!("item {i}")),
			model: json!(i),
			item: json!({ "id": i }),
		})
		.collect()
}

fn open(n: usize, auto_highlight: bool) -> QueryState {
	let mut state = QueryState::default();
	state.replace_matches(matches(n), auto_highlight, "item".into(), None);
	state
}

#[test]
fn default_state_is_closed() {
	let state = QueryState::default();
	assert_eq!(state.phase(), Phase::Closed);
	assert_eq!(state.active_index(), -1);
	assert!(!state.is_open());
}

#[test]
fn auto_highlight_selects_first() {
	let state = open(3, true);
	assert_eq!(state.phase(), Phase::Open { active: 0 });
	assert_eq!(state.active_match().map(|m| m.model.clone()), Some(json!(0)));
	assert_eq!(state.query(), Some("item"));
}

#[test]
fn without_auto_highlight_nothing_is_active() {
	let state = open(3, false);
	assert_eq!(state.phase(), Phase::OpenUnselected);
	assert_eq!(state.active_index(), -1);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn next_wraps_from_last_to_first(#[case] n: usize) {
	let mut state = open(n, true);
	assert!(state.set_active(n - 1));

	state.next_match();
	assert_eq!(state.active(), Some(0));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn prev_wraps_from_first_to_last(#[case] n: usize) {
	let mut state = open(n, true);

	state.prev_match();
	assert_eq!(state.active(), Some(n - 1));
}

#[test]
fn navigation_from_unselected() {
	let mut state = open(4, false);
	state.next_match();
	assert_eq!(state.active(), Some(0));

	let mut state = open(4, false);
	state.prev_match();
	assert_eq!(state.active(), Some(3));
}

#[test]
fn full_cycle_returns_to_start() {
	let mut state = open(4, true);
	for _ in 0..4 {
		state.next_match();
	}
	assert_eq!(state.active(), Some(0));
	for _ in 0..4 {
		state.prev_match();
	}
	assert_eq!(state.active(), Some(0));
}

#[test]
fn navigation_on_closed_state_is_noop() {
	let mut state = QueryState::default();
	state.next_match();
	state.prev_match();
	assert_eq!(state.active(), None);
}

#[test]
fn set_active_rejects_out_of_range() {
	let mut state = open(2, true);
	assert!(!state.set_active(2));
	assert_eq!(state.active(), Some(0));
	assert!(state.is_active(0));
}

#[test]
fn reset_is_idempotent() {
	let mut state = open(3, true);
	state.set_loading(true);
	state.reset();
	let once = state.clone();
	state.reset();

	assert_eq!(state, once);
	assert_eq!(state, QueryState::default());
}

#[rstest]
#[case(Staleness::Value, true)]
#[case(Staleness::Sequence, false)]
fn identical_text_from_different_requests(#[case] policy: Staleness, #[case] same: bool) {
	let earlier = QueryToken { value: "ab".into(), seq: 1 };
	let later = QueryToken { value: "ab".into(), seq: 2 };
	assert_eq!(earlier.matches(&later, policy), same);
}

#[test]
fn label_text_renders_non_strings() {
	let m = Match {
		label: json!({ "n": 1 }),
		model: Value::Null,
		item: Value::Null,
	};
	assert_eq!(m.label_text(), r#"{"n":1}"#);

	let m = Match {
		label: json!("Alaska"),
		model: Value::Null,
		item: Value::Null,
	};
	assert_eq!(m.highlighted("las"), "A<strong>las</strong>ka");
}
