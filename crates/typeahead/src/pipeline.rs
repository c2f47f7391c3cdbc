//! Ordered query-parser chain.
//!
//! Every query passes through the registered parsers in registration order
//! before any lookup is issued. A parser may rewrite the query, suspend, or
//! veto it by returning `None`, which ends the chain.
//!
//! A chain may also carry a [`Debouncer`] that runs ahead of every parser.
//! Its slot is reserved when [`QueryChain::run`] is called, so among queries
//! issued back to back only the last one gets past it.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::trace;

use crate::debounce::Debouncer;

/// One stage of the query chain.
#[async_trait]
pub trait QueryParser: Send + Sync + 'static {
	/// Transforms `query`, or returns `None` to drop it.
	async fn parse(&self, query: String) -> Option<String>;
}

/// A synchronous parser built from a closure. See [`parser_fn`].
pub struct FnParser<F>(F);

impl<F> std::fmt::Debug for FnParser<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("FnParser")
	}
}

#[async_trait]
impl<F> QueryParser for FnParser<F>
where
	F: Fn(String) -> Option<String> + Send + Sync + 'static,
{
	async fn parse(&self, query: String) -> Option<String> {
		(self.0)(query)
	}
}

/// Wraps a closure as a [`QueryParser`].
///
/// ```
/// use suggest_typeahead::parser_fn;
///
/// let trim = parser_fn(|q: String| Some(q.trim().to_string()));
/// let not_digits = parser_fn(|q: String| (!q.chars().all(|c| c.is_ascii_digit())).then_some(q));
/// # let _ = (trim, not_digits);
/// ```
pub fn parser_fn<F>(f: F) -> FnParser<F>
where
	F: Fn(String) -> Option<String> + Send + Sync + 'static,
{
	FnParser(f)
}

/// Ordered list of parsers, cheap to clone into spawned tasks.
#[derive(Clone, Default)]
pub struct QueryChain {
	debounce: Option<Arc<Debouncer>>,
	stages: Arc<[Arc<dyn QueryParser>]>,
}

impl std::fmt::Debug for QueryChain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QueryChain")
			.field("debounce", &self.debounce.as_ref().map(|d| d.wait_duration()))
			.field("stages", &self.stages.len())
			.finish()
	}
}

impl QueryChain {
	/// Freezes `stages` into a chain.
	pub fn new(stages: Vec<Arc<dyn QueryParser>>) -> Self {
		Self {
			debounce: None,
			stages: stages.into(),
		}
	}

	/// Debounces every query ahead of the parsers.
	pub fn with_debounce(mut self, debouncer: Arc<Debouncer>) -> Self {
		self.debounce = Some(debouncer);
		self
	}

	/// The leading debouncer, if any.
	pub fn debouncer(&self) -> Option<&Debouncer> {
		self.debounce.as_deref()
	}

	/// Number of parser stages, not counting the debouncer.
	pub fn len(&self) -> usize {
		self.stages.len()
	}

	/// Returns true when the chain has no parser stages.
	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Runs `query` through the debouncer and every stage in order.
	///
	/// The debounce slot is reserved before this returns; the returned future
	/// only waits on it. Resolves `None` when the query is debounced away or
	/// a stage vetoes.
	pub fn run(&self, query: String) -> BoxFuture<'static, Option<String>> {
		let ticket = self.debounce.as_ref().map(|debouncer| debouncer.reserve());
		let stages = Arc::clone(&self.stages);

		async move {
			if let Some(ticket) = ticket
				&& !ticket.wait().await
			{
				trace!(query = %query, "query debounced");
				return None;
			}

			let mut value = query;
			for (index, stage) in stages.iter().enumerate() {
				match stage.parse(value).await {
					Some(next) => value = next,
					None => {
						trace!(stage = index, "query vetoed");
						return None;
					}
				}
			}
			Some(value)
		}
		.boxed()
	}
}

#[cfg(test)]
mod tests;
