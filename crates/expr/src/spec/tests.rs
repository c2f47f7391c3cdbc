use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[test]
fn parses_label_clause() {
	let spec = ExpressionSpec::parse("selected as selected.name for selected in items").unwrap();

	assert_eq!(spec.item_name, "selected");
	assert_eq!(spec.label.source(), "selected.name");
	assert_eq!(spec.model.source(), "selected");
	assert_eq!(spec.collection.source(), "items");
	assert!(!spec.label_is_model());
}

#[test]
fn label_defaults_to_model() {
	let spec = ExpressionSpec::parse("item for item in source").unwrap();

	assert_eq!(spec.item_name, "item");
	assert_eq!(spec.label, spec.model);
	assert!(spec.label_is_model());
	assert_eq!(spec.collection.source(), "source");
}

#[test]
fn collection_consumes_rest_of_input() {
	let spec = ExpressionSpec::parse("  s.id as s.name for s in states | filter:$viewValue | limitTo:8")
		.unwrap();

	assert_eq!(spec.model.source(), "s.id");
	assert_eq!(spec.label.source(), "s.name");
	assert_eq!(spec.collection.source(), "states | filter:$viewValue | limitTo:8");
}

#[test]
fn dollar_and_underscore_item_names() {
	let spec = ExpressionSpec::parse("$it for $it in list").unwrap();
	assert_eq!(spec.item_name, "$it");

	let spec = ExpressionSpec::parse("_x1 for _x1 in list").unwrap();
	assert_eq!(spec.item_name, "_x1");
}

#[test]
fn from_str_matches_parse() {
	let parsed: ExpressionSpec = "a for a in b".parse().unwrap();
	assert_eq!(parsed, ExpressionSpec::parse("a for a in b").unwrap());
}

#[rstest]
#[case::no_keywords("justtext")]
#[case::missing_in("item for item")]
#[case::missing_for("item in items")]
#[case::numeric_item("x for 1x in items")]
#[case::blank_model("   for x in items")]
#[case::empty("")]
fn rejects_malformed_specifications(#[case] input: &str) {
	let err = ExpressionSpec::parse(input).unwrap_err();
	assert_eq!(
		err,
		SpecError::InvalidSpecification {
			input: input.to_string()
		}
	);
}

#[test]
fn error_message_carries_input() {
	let err = ExpressionSpec::parse("justtext").unwrap_err();
	assert!(err.to_string().ends_with("but got 'justtext'"));
}
