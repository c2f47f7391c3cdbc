use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use suggest_typeahead::JsonHost;

use super::*;

#[test]
fn parses_commands() {
	assert_eq!(Command::parse("ala"), Ok(Command::Input("ala".into())));
	assert_eq!(Command::parse(""), Ok(Command::Input(String::new())));
	assert_eq!(Command::parse(":down"), Ok(Command::Next));
	assert_eq!(Command::parse(":up"), Ok(Command::Prev));
	assert_eq!(Command::parse(":enter"), Ok(Command::Select(None)));
	assert_eq!(Command::parse(":enter 2"), Ok(Command::Select(Some(2))));
	assert_eq!(Command::parse(":esc"), Ok(Command::Dismiss));
	assert_eq!(Command::parse(":quit"), Ok(Command::Quit));
	assert!(Command::parse(":enter x").is_err());
	assert!(Command::parse(":jump").is_err());
}

#[tokio::test]
async fn session_round_trip() {
	let host = Arc::new(JsonHost::new(json!({ "xs": ["Alpha", "Alps", "Beta"] })));
	let mut ctrl = TypeaheadController::builder("x for x in xs | filter:$viewValue", host)
		.build()
		.unwrap();

	let out = apply(&mut ctrl, Command::Input("al".into())).await.unwrap();
	assert_eq!(out, "> 0: <strong>Al</strong>pha\n  1: <strong>Al</strong>ps\n");

	let out = apply(&mut ctrl, Command::Next).await.unwrap();
	assert_eq!(out, "  0: <strong>Al</strong>pha\n> 1: <strong>Al</strong>ps\n");

	let out = apply(&mut ctrl, Command::Select(None)).await.unwrap();
	assert_eq!(out, "selected \"Alps\" (shown as \"Alps\")\n");

	let out = apply(&mut ctrl, Command::Select(None)).await.unwrap();
	assert_eq!(out, "nothing to select\n");

	assert_eq!(apply(&mut ctrl, Command::Quit).await, None);
}

#[tokio::test]
async fn dismiss_closes_popup() {
	let host = Arc::new(JsonHost::new(json!({ "xs": ["a1"] })));
	let mut ctrl = TypeaheadController::builder("x for x in xs", host).build().unwrap();

	apply(&mut ctrl, Command::Input("a".into())).await;
	let out = apply(&mut ctrl, Command::Dismiss).await.unwrap();
	assert_eq!(out, "(no matches)\n");
}
