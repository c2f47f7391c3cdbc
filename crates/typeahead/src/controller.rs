//! Typeahead query lifecycle controller.
//!
//! The controller turns raw input into a match list:
//!
//! 1. [`set_query`](TypeaheadController::set_query) records the input as the
//!    current query and spawns the [`QueryChain`].
//! 2. When the chain resolves, the result is applied only if it still
//!    belongs to the current query; then
//!    [`get_matches`](TypeaheadController::get_matches) asks the [`Host`]
//!    for the collection.
//! 3. When the lookup resolves, the result is applied only if it belongs to
//!    the most recently issued lookup ("last dispatched, last accepted").
//!
//! # Event delivery
//!
//! Spawned work never touches controller state. Results come back as
//! [`LifecycleEvent`]s on an internal channel and are applied on the owner's
//! task by [`pump`](TypeaheadController::pump),
//! [`pump_ready`](TypeaheadController::pump_ready) or
//! [`settle`](TypeaheadController::settle). Every handler re-checks
//! staleness before mutating, since the state may have moved on while the
//! work was in flight.
//!
//! Query and lookup work is spawned with [`tokio::spawn`], so the controller
//! must be driven from within a tokio runtime.

use std::sync::Arc;

use serde_json::Value;
use suggest_expr::{Expression, ExpressionSpec, Locals, SpecError};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::debounce::Debouncer;
use crate::error::LookupError;
use crate::host::{Host, LoadingSink, ModelSetter, PopupPosition, PositionCalculator, PositionMode};
use crate::options::TypeaheadOptions;
use crate::pipeline::{QueryChain, QueryParser};
use crate::state::{Match, QueryState, QueryToken};

/// Local bound to the text being looked up.
pub const VIEW_VALUE: &str = "$viewValue";

/// Local bound to the model value while formatting it for display.
pub const MODEL: &str = "$model";

/// Callback notified with `(model, match)` when a match is selected.
pub type SelectListener = Box<dyn FnMut(&Value, &Match) + Send>;

/// Result of spawned work, applied by the controller on its own task.
#[derive(Debug)]
pub enum LifecycleEvent {
	/// The query chain finished for `token`; `None` means a stage vetoed it.
	QueryResolved {
		/// The query the chain ran for.
		token: QueryToken,
		/// The chain's output.
		value: Option<String>,
	},
	/// The host finished a collection lookup.
	LookupResolved {
		/// The lookup this result belongs to.
		token: QueryToken,
		/// Collection items, or why there are none.
		result: Result<Vec<Value>, LookupError>,
	},
}

/// Builder registering parsers, listeners and collaborators before first use.
pub struct TypeaheadBuilder {
	spec: String,
	host: Arc<dyn Host>,
	options: TypeaheadOptions,
	parsers: Vec<Arc<dyn QueryParser>>,
	select_listeners: Vec<SelectListener>,
	loading: Option<Box<dyn LoadingSink>>,
	position: Option<Box<dyn PositionCalculator>>,
	model_setter: Option<Box<dyn ModelSetter>>,
}

impl std::fmt::Debug for TypeaheadBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeaheadBuilder")
			.field("spec", &self.spec)
			.field("options", &self.options)
			.field("parsers", &self.parsers.len())
			.field("select_listeners", &self.select_listeners.len())
			.finish_non_exhaustive()
	}
}

impl TypeaheadBuilder {
	/// Sets behaviour options.
	pub fn options(mut self, options: TypeaheadOptions) -> Self {
		self.options = options;
		self
	}

	/// Appends a query parser. Parsers run in the order they are added.
	pub fn query_parser(mut self, parser: impl QueryParser) -> Self {
		self.parsers.push(Arc::new(parser));
		self
	}

	/// Appends a select listener. Listeners run in the order they are added.
	pub fn on_select(mut self, listener: impl FnMut(&Value, &Match) + Send + 'static) -> Self {
		self.select_listeners.push(Box::new(listener));
		self
	}

	/// Sets the loading flag sink.
	pub fn loading_sink(mut self, sink: impl LoadingSink + 'static) -> Self {
		self.loading = Some(Box::new(sink));
		self
	}

	/// Sets the popup position calculator.
	pub fn position_calculator(mut self, calculator: impl PositionCalculator + 'static) -> Self {
		self.position = Some(Box::new(calculator));
		self
	}

	/// Sets the model setter used when a match is selected.
	pub fn model_setter(mut self, setter: impl ModelSetter + 'static) -> Self {
		self.model_setter = Some(Box::new(setter));
		self
	}

	/// Parses the specification and builds the controller.
	///
	/// With a non-zero `wait-ms` a [`Debouncer`] runs ahead of every
	/// registered parser.
	///
	/// # Errors
	///
	/// Returns [`SpecError::InvalidSpecification`] when the specification
	/// string is malformed; no controller exists in that case.
	pub fn build(self) -> Result<TypeaheadController, SpecError> {
		let spec = Arc::new(ExpressionSpec::parse(&self.spec)?);

		let mut chain = QueryChain::new(self.parsers);
		if self.options.wait_ms > 0 {
			chain = chain.with_debounce(Arc::new(Debouncer::new(self.options.wait())));
		}

		let input_formatter = self.options.input_formatter.as_deref().map(Expression::new);
		let (events_tx, events_rx) = mpsc::unbounded_channel();

		debug!(
			spec = %self.spec,
			item = %spec.item_name,
			stages = chain.len(),
			debounce_ms = self.options.wait_ms,
			"typeahead controller built"
		);

		Ok(TypeaheadController {
			spec,
			host: self.host,
			options: self.options,
			chain,
			input_formatter,
			select_listeners: self.select_listeners,
			loading: self.loading,
			position: self.position,
			model_setter: self.model_setter,
			state: QueryState::default(),
			seq: 0,
			in_flight: 0,
			valid: true,
			events_tx,
			events_rx,
		})
	}
}

/// Query lifecycle controller for one typeahead input.
pub struct TypeaheadController {
	spec: Arc<ExpressionSpec>,
	host: Arc<dyn Host>,
	options: TypeaheadOptions,
	chain: QueryChain,
	input_formatter: Option<Expression>,
	select_listeners: Vec<SelectListener>,
	loading: Option<Box<dyn LoadingSink>>,
	position: Option<Box<dyn PositionCalculator>>,
	model_setter: Option<Box<dyn ModelSetter>>,
	state: QueryState,
	seq: u64,
	in_flight: usize,
	valid: bool,
	events_tx: mpsc::UnboundedSender<LifecycleEvent>,
	events_rx: mpsc::UnboundedReceiver<LifecycleEvent>,
}

impl std::fmt::Debug for TypeaheadController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeaheadController")
			.field("spec", &self.spec)
			.field("options", &self.options)
			.field("chain", &self.chain)
			.field("state", &self.state)
			.field("in_flight", &self.in_flight)
			.field("valid", &self.valid)
			.finish_non_exhaustive()
	}
}

impl TypeaheadController {
	/// Starts building a controller for `spec` evaluated by `host`.
	pub fn builder(spec: impl Into<String>, host: Arc<dyn Host>) -> TypeaheadBuilder {
		TypeaheadBuilder {
			spec: spec.into(),
			host,
			options: TypeaheadOptions::default(),
			parsers: Vec::new(),
			select_listeners: Vec::new(),
			loading: None,
			position: None,
			model_setter: None,
		}
	}

	/// The parsed specification.
	pub fn spec(&self) -> &ExpressionSpec {
		&self.spec
	}

	/// The options this controller was built with.
	pub fn options(&self) -> &TypeaheadOptions {
		&self.options
	}

	/// Current match and selection state.
	pub fn state(&self) -> &QueryState {
		&self.state
	}

	/// Number of spawned query or lookup tasks whose results are not yet applied.
	pub fn in_flight(&self) -> usize {
		self.in_flight
	}

	/// Whether the input currently holds an acceptable model value.
	///
	/// Always true for editable typeaheads. For non-editable ones, free text
	/// makes it false until a match is selected or the input is emptied.
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	fn next_token(&mut self, value: String) -> QueryToken {
		self.seq = self.seq.wrapping_add(1);
		QueryToken {
			value,
			seq: self.seq,
		}
	}

	fn set_loading(&mut self, loading: bool) {
		self.state.set_loading(loading);
		if let Some(sink) = self.loading.as_mut() {
			sink.set_loading(loading);
		}
	}

	fn reset(&mut self) {
		if let Some(debouncer) = self.chain.debouncer() {
			debouncer.cancel();
		}
		self.state.reset();
		self.set_loading(false);
	}

	/// Closes the popup (blur, escape, click outside).
	pub fn dismiss(&mut self) {
		self.set_query(None);
	}

	/// Starts a query for `query`.
	///
	/// `None` resets everything. An empty string also clears the matches but
	/// is remembered as the current query; no lookup is issued for it.
	pub fn set_query(&mut self, query: Option<&str>) {
		let Some(query) = query else {
			self.reset();
			return;
		};

		if query.is_empty() {
			self.reset();
			self.state.current_query = Some(self.next_token(String::new()));
			return;
		}

		let token = self.next_token(query.to_string());
		self.state.current_query = Some(token.clone());
		trace!(query, seq = token.seq, "query started");

		// Reserves the debounce slot before the task exists.
		let run = self.chain.run(token.value.clone());
		let events = self.events_tx.clone();
		self.in_flight += 1;
		tokio::spawn(async move {
			let value = run.await;
			let _ = events.send(LifecycleEvent::QueryResolved { token, value });
		});
	}

	/// Looks up matches for `input`.
	///
	/// Normally reached through [`set_query`](Self::set_query); calling it
	/// directly skips the query chain.
	pub fn get_matches(&mut self, input: &str) {
		let token = self.next_token(input.to_string());
		self.state.last_lookup = Some(token.clone());
		self.set_loading(true);

		let mut locals = Locals::new();
		locals.insert(VIEW_VALUE.to_string(), Value::String(input.to_string()));
		let lookup = self.host.lookup(&self.spec.collection, locals);
		debug!(input, seq = token.seq, "lookup issued");

		let events = self.events_tx.clone();
		self.in_flight += 1;
		tokio::spawn(async move {
			let result = lookup.await;
			let _ = events.send(LifecycleEvent::LookupResolved { token, result });
		});
	}

	/// Applies one result of spawned work.
	pub fn handle_event(&mut self, event: LifecycleEvent) {
		self.in_flight = self.in_flight.saturating_sub(1);
		let policy = self.options.staleness;

		match event {
			LifecycleEvent::QueryResolved { token, value } => {
				let current = self
					.state
					.current_query
					.as_ref()
					.is_some_and(|current| current.matches(&token, policy));
				if !current {
					trace!(query = %token.value, seq = token.seq, "stale query dropped");
					return;
				}
				match value {
					Some(value) => self.get_matches(&value),
					None => trace!(query = %token.value, "query vetoed by parser chain"),
				}
			}
			LifecycleEvent::LookupResolved { token, result } => {
				let current = self
					.state
					.last_lookup
					.as_ref()
					.is_some_and(|last| last.matches(&token, policy));
				if !current {
					trace!(input = %token.value, seq = token.seq, "stale lookup dropped");
					return;
				}
				match result {
					Ok(items) if !items.is_empty() => {
						debug!(input = %token.value, count = items.len(), "lookup accepted");
						self.materialize(&token.value, items);
					}
					Ok(_) => {
						debug!(input = %token.value, "lookup returned no matches");
						self.clear_matches();
					}
					Err(error) => {
						debug!(input = %token.value, %error, "lookup failed");
						self.clear_matches();
					}
				}
				self.set_loading(false);
			}
		}
	}

	fn materialize(&mut self, input: &str, items: Vec<Value>) {
		let mut locals = Locals::new();
		locals.insert(VIEW_VALUE.to_string(), Value::String(input.to_string()));

		let mut matches = Vec::with_capacity(items.len());
		for item in items {
			locals.insert(self.spec.item_name.clone(), item.clone());
			let label = self.host.evaluate(&self.spec.label, &locals);
			let model = self.host.evaluate(&self.spec.model, &locals);
			matches.push(Match { label, model, item });
		}

		let mode = if self.options.append_to_body {
			PositionMode::Offset
		} else {
			PositionMode::Relative
		};
		let position = self
			.position
			.as_ref()
			.map(|calculator| PopupPosition::from(calculator.anchor(mode)));

		self.state
			.replace_matches(matches, self.options.auto_highlight, input.to_string(), position);
	}

	/// Empty or failed lookup: the popup closes, queries still in the chain
	/// stay current.
	fn clear_matches(&mut self) {
		let current_query = self.state.current_query.take();
		self.state.reset();
		self.state.current_query = current_query;
	}

	/// Waits for the next result of spawned work and applies it.
	///
	/// Returns `false` only if the event channel is closed.
	pub async fn pump(&mut self) -> bool {
		match self.events_rx.recv().await {
			Some(event) => {
				self.handle_event(event);
				true
			}
			None => false,
		}
	}

	/// Applies every result that is already available. Returns how many.
	pub fn pump_ready(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(event) = self.events_rx.try_recv() {
			self.handle_event(event);
			applied += 1;
		}
		applied
	}

	/// Pumps until no spawned work is outstanding.
	///
	/// Lookups issued while applying results are waited for as well.
	pub async fn settle(&mut self) {
		while self.in_flight > 0 {
			if !self.pump().await {
				break;
			}
		}
	}

	/// Moves the active match forward, wrapping around.
	pub fn next_match(&mut self) {
		self.state.next_match();
	}

	/// Moves the active match back, wrapping around.
	pub fn prev_match(&mut self) {
		self.state.prev_match();
	}

	/// Selects the active match, or the match at `index` when given.
	///
	/// Commits the model value, closes the popup, then notifies every
	/// select listener in registration order. Returns the selected match, or
	/// `None` when there is nothing to select.
	pub fn select_active(&mut self, index: Option<usize>) -> Option<Match> {
		if let Some(index) = index
			&& !self.state.set_active(index)
		{
			debug!(index, len = self.state.matches().len(), "selection index out of range");
			return None;
		}
		let selected = self.state.active_match()?.clone();
		self.select(&selected);
		Some(selected)
	}

	fn select(&mut self, selected: &Match) {
		if let Some(setter) = self.model_setter.as_mut() {
			setter.set_model(selected.model.clone());
		}
		self.reset();
		self.valid = true;
		debug!(label = %selected.label_text(), "match selected");

		for listener in &mut self.select_listeners {
			listener(&selected.model, selected);
		}
	}

	/// Feeds a new view value from the input.
	///
	/// Input shorter than `min-length` (see
	/// [`effective_min_length`](TypeaheadOptions::effective_min_length))
	/// closes the popup; anything else starts a query. Returns the value to store as the model: the input itself, or
	/// `None` for free text in a non-editable typeahead.
	pub fn on_input(&mut self, input: &str) -> Option<String> {
		if !input.is_empty() && input.chars().count() >= self.options.effective_min_length() {
			self.set_query(Some(input));
		} else {
			self.set_query(None);
		}

		if self.options.editable || input.is_empty() {
			self.valid = true;
			Some(input.to_string())
		} else {
			self.valid = false;
			None
		}
	}

	/// Formats a model value for display in the input.
	///
	/// Uses the `input-formatter` expression when configured. Otherwise the
	/// label expression is evaluated with the item bound to `model`; if that
	/// does not depend on the item, `model` is returned unchanged.
	pub fn format_model(&self, model: &Value) -> Value {
		let mut locals = Locals::new();

		if let Some(formatter) = &self.input_formatter {
			locals.insert(MODEL.to_string(), model.clone());
			return self.host.evaluate(formatter, &locals);
		}

		locals.insert(self.spec.item_name.clone(), model.clone());
		let candidate = self.host.evaluate(&self.spec.label, &locals);
		locals.insert(self.spec.item_name.clone(), Value::Null);
		let empty = self.host.evaluate(&self.spec.label, &locals);

		if candidate != empty {
			candidate
		} else {
			model.clone()
		}
	}
}
