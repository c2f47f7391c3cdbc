//! Expression layer for the `suggest` typeahead toolkit.
//!
//! Two concerns live here:
//!
//! - **Specification strings**: [`ExpressionSpec::parse`] splits a string of the
//!   form `model (as label)? for item in collection` into its sub-expressions.
//!   The sub-expressions are opaque [`Expression`]s; evaluating them is the
//!   host's job.
//! - **A small expression language** ([`Program`]) for hosts whose scope is a
//!   `serde_json::Value`. It covers paths, literals and the `filter` / `limitTo`
//!   pipes, which is what typical typeahead collections need.
//!
//! ```
//! use serde_json::json;
//! use suggest_expr::{ExpressionSpec, Locals, Program};
//!
//! let spec = ExpressionSpec::parse("s as s.name for s in states | filter:$viewValue").unwrap();
//! assert_eq!(spec.item_name, "s");
//!
//! let scope = json!({ "states": [{ "name": "Alabama" }, { "name": "Alaska" }, { "name": "Ohio" }] });
//! let mut locals = Locals::new();
//! locals.insert("$viewValue".into(), json!("ala"));
//!
//! let program = Program::compile(spec.collection.source()).unwrap();
//! let found = program.evaluate(&scope, &locals);
//! assert_eq!(found.as_array().map(Vec::len), Some(2));
//! ```

mod error;
mod eval;
mod expression;
mod spec;

pub use error::{EvalError, SpecError};
pub use eval::{Program, ProgramCache};
pub use expression::{Expression, Locals};
pub use spec::ExpressionSpec;
