//! Typeahead query lifecycle.
//!
//! This crate is the engine behind an autocomplete input, without any UI:
//!
//! - a [`TypeaheadController`] that runs input through an ordered
//!   [`QueryParser`] chain, looks up candidates through a [`Host`], and keeps
//!   only the result of the latest request;
//! - [`Debouncer`] / [`DebounceTicket`], single-slot cancellable timers;
//! - [`QueryState`], the match list plus an active index with wrap-around
//!   navigation;
//! - [`highlight`], case-insensitive query highlighting for labels;
//! - [`JsonHost`], a ready-made host over a `serde_json::Value` scope.
//!
//! Rendering, measurement and key handling belong to the embedding
//! application; it reads [`QueryState`] and calls
//! [`next_match`](TypeaheadController::next_match),
//! [`select_active`](TypeaheadController::select_active) and friends.

mod controller;
mod debounce;
mod error;
pub mod highlight;
mod host;
mod json_host;
mod options;
mod pipeline;
mod state;

pub use controller::{
	LifecycleEvent, MODEL, SelectListener, TypeaheadBuilder, TypeaheadController, VIEW_VALUE,
};
pub use debounce::{DebounceTicket, Debouncer};
pub use error::{ConfigError, LookupError};
pub use host::{
	AnchorRect, Host, LoadingSink, LookupFuture, ModelSetter, PopupPosition, PositionCalculator,
	PositionMode,
};
pub use json_host::JsonHost;
pub use options::{Staleness, TypeaheadOptions};
pub use pipeline::{FnParser, QueryChain, QueryParser, parser_fn};
pub use state::{Match, Phase, QueryState, QueryToken};
pub use suggest_expr::{Expression, ExpressionSpec, Locals, SpecError};
