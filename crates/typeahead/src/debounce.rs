//! Debounce with cancellation.
//!
//! A [`Debouncer`] holds at most one pending timer. [`Debouncer::reserve`]
//! claims the slot synchronously and cancels whatever held it before, so the
//! latest reservation wins no matter in which order the waiting tasks are
//! first polled. A cancelled or superseded [`DebounceTicket`] resolves
//! `false` without sleeping out its period.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Single-slot cancellable timer.
#[derive(Debug)]
pub struct Debouncer {
	wait: Duration,
	slot: Arc<Mutex<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
	generation: u64,
	pending: Option<CancellationToken>,
}

impl Debouncer {
	/// Creates a debouncer with the given quiet period.
	pub fn new(wait: Duration) -> Self {
		Self {
			wait,
			slot: Arc::new(Mutex::new(Slot::default())),
		}
	}

	/// The quiet period.
	pub fn wait_duration(&self) -> Duration {
		self.wait
	}

	/// Returns true while a reservation is outstanding.
	pub fn is_pending(&self) -> bool {
		self.slot.lock().pending.is_some()
	}

	/// Cancels the outstanding reservation, if any.
	pub fn cancel(&self) {
		let mut slot = self.slot.lock();
		slot.generation = slot.generation.wrapping_add(1);
		if let Some(token) = slot.pending.take() {
			token.cancel();
		}
	}

	/// Claims the slot, cancelling the previous reservation.
	///
	/// Call this where the debounced work is issued, not inside the task that
	/// waits on it.
	pub fn reserve(&self) -> DebounceTicket {
		let cancel = CancellationToken::new();
		let mut slot = self.slot.lock();
		slot.generation = slot.generation.wrapping_add(1);
		if let Some(previous) = slot.pending.replace(cancel.clone()) {
			previous.cancel();
		}
		DebounceTicket {
			generation: slot.generation,
			cancel,
			wait: self.wait,
			slot: Arc::clone(&self.slot),
		}
	}

	/// Reserves and waits in one step.
	pub async fn wait(&self) -> bool {
		self.reserve().wait().await
	}
}

/// One reservation of a [`Debouncer`] slot.
#[derive(Debug)]
#[must_use = "a ticket does nothing unless waited on"]
pub struct DebounceTicket {
	generation: u64,
	cancel: CancellationToken,
	wait: Duration,
	slot: Arc<Mutex<Slot>>,
}

impl DebounceTicket {
	/// Returns true once a later reservation or a cancel superseded this one.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Waits for the quiet period.
	///
	/// Resolves `true` if the period elapsed with this ticket still holding
	/// the slot, `false` as soon as it is superseded.
	pub async fn wait(self) -> bool {
		if self.cancel.is_cancelled() {
			trace!(generation = self.generation, "debounce superseded before waiting");
			return false;
		}

		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => {
				trace!(generation = self.generation, "debounce superseded");
				false
			}
			_ = sleep(self.wait) => self.slot.lock().generation == self.generation,
		}
	}
}

impl Drop for DebounceTicket {
	fn drop(&mut self) {
		let mut slot = self.slot.lock();
		if slot.generation == self.generation {
			slot.pending = None;
		}
	}
}

#[cfg(test)]
mod tests;
