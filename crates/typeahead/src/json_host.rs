//! A [`Host`] backed by a JSON scope and the `suggest-expr` language.

use std::time::Duration;

use futures::FutureExt;
use parking_lot::RwLock;
use serde_json::Value;
use suggest_expr::{Expression, Locals, ProgramCache};
use tracing::warn;

use crate::error::LookupError;
use crate::host::{Host, LookupFuture};

/// Evaluates expressions against an in-memory `serde_json::Value` scope.
///
/// The scope can be swapped at any time with [`JsonHost::set_scope`]; the
/// next lookup sees the new data. An optional latency delays every lookup,
/// which is handy for demos and tests of out-of-order responses.
#[derive(Debug, Default)]
pub struct JsonHost {
	scope: RwLock<Value>,
	programs: ProgramCache,
	latency: Duration,
}

impl JsonHost {
	/// Creates a host over `scope`.
	pub fn new(scope: Value) -> Self {
		Self {
			scope: RwLock::new(scope),
			programs: ProgramCache::new(),
			latency: Duration::ZERO,
		}
	}

	/// Delays every lookup by `latency`.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	/// Replaces the scope.
	pub fn set_scope(&self, scope: Value) {
		*self.scope.write() = scope;
	}

	/// Returns a copy of the current scope.
	pub fn scope(&self) -> Value {
		self.scope.read().clone()
	}

	fn collect(&self, expr: &Expression, locals: &Locals) -> Result<Vec<Value>, LookupError> {
		let program = self.programs.get(expr)?;
		match program.evaluate(&self.scope.read(), locals) {
			Value::Array(items) => Ok(items),
			Value::Null => Ok(Vec::new()),
			_ => Err(LookupError::NotACollection(expr.source().to_string())),
		}
	}
}

impl Host for JsonHost {
	fn evaluate(&self, expr: &Expression, locals: &Locals) -> Value {
		match self.programs.get(expr) {
			Ok(program) => program.evaluate(&self.scope.read(), locals),
			Err(error) => {
				warn!(expr = expr.source(), %error, "expression failed to compile");
				Value::Null
			}
		}
	}

	fn lookup(&self, expr: &Expression, locals: Locals) -> LookupFuture {
		let result = self.collect(expr, &locals);
		if self.latency.is_zero() {
			return futures::future::ready(result).boxed();
		}
		let latency = self.latency;
		async move {
			tokio::time::sleep(latency).await;
			result
		}
		.boxed()
	}
}

#[cfg(test)]
mod tests;
