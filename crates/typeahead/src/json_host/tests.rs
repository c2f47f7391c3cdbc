use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn locals(view_value: &str) -> Locals {
	let mut locals = Locals::new();
	locals.insert("$viewValue".into(), json!(view_value));
	locals
}

#[tokio::test]
async fn lookup_filters_collection() {
	let host = JsonHost::new(json!({ "states": ["Alabama", "Alaska", "Ohio"] }));
	let items = host
		.lookup(&Expression::new("states | filter:$viewValue"), locals("al"))
		.await
		.unwrap();

	assert_eq!(items, vec![json!("Alabama"), json!("Alaska")]);
}

#[tokio::test]
async fn missing_collection_is_empty() {
	let host = JsonHost::new(json!({}));
	let items = host.lookup(&Expression::new("states"), locals("x")).await.unwrap();
	assert!(items.is_empty());
}

#[tokio::test]
async fn scalar_collection_is_an_error() {
	let host = JsonHost::new(json!({ "states": "nope" }));
	let err = host.lookup(&Expression::new("states"), locals("x")).await.unwrap_err();
	assert_eq!(err, LookupError::NotACollection("states".into()));
}

#[tokio::test]
async fn malformed_collection_is_an_error() {
	let host = JsonHost::new(json!({}));
	let err = host.lookup(&Expression::new("states |"), locals("x")).await.unwrap_err();
	assert!(matches!(err, LookupError::Eval(_)));
}

#[tokio::test(start_paused = true)]
async fn latency_delays_resolution() {
	let host = JsonHost::new(json!({ "xs": [1] })).with_latency(Duration::from_millis(500));
	let start = tokio::time::Instant::now();

	let items = host.lookup(&Expression::new("xs"), Locals::new()).await.unwrap();

	assert_eq!(items, vec![json!(1)]);
	assert!(start.elapsed() >= Duration::from_millis(500));
}

#[test]
fn evaluate_uses_locals_then_scope() {
	let host = JsonHost::new(json!({ "suffix": "!" }));
	let mut locals = Locals::new();
	locals.insert("s".into(), json!({ "name": "Ohio" }));

	assert_eq!(host.evaluate(&Expression::new("s.name"), &locals), json!("Ohio"));
	assert_eq!(host.evaluate(&Expression::new("suffix"), &locals), json!("!"));
	assert_eq!(host.evaluate(&Expression::new("s |"), &locals), Value::Null);
}

#[test]
fn set_scope_replaces_data() {
	let host = JsonHost::new(json!({ "a": 1 }));
	host.set_scope(json!({ "a": 2 }));
	assert_eq!(host.scope(), json!({ "a": 2 }));
}
