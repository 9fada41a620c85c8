//! Issues searches and tracks the handles that own them.
//!
//! The [`SubscriptionManager`] never cancels on its own: sequencing handles is
//! the caller's job. It only guarantees that every handle gets a fresh id, so
//! the consumer can tell events of superseded handles apart.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use lookout_stream::{AbortController, EventEnvelope, ResponseStream};
use serde::Serialize;
use tracing::{debug, trace};

use super::{SearchClient, SearchOptions};

/// Lifecycle of a single handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
	/// Events are still expected.
	Active,
	/// A terminal event was applied and the handle unsubscribed itself.
	Finished,
	/// The owner cancelled the handle before a terminal event arrived.
	Cancelled,
}

/// One in-flight search operation.
#[derive(Debug)]
pub struct Handle {
	id: u64,
	state: HandleState,
	controller: AbortController,
}

impl Handle {
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	#[must_use]
	pub fn state(&self) -> HandleState {
		self.state
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.state == HandleState::Active
	}
}

/// Counters describing what a manager has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionStats {
	pub issued: u64,
	pub finished: u64,
	pub cancelled: u64,
}

/// Thin wrapper around the search collaborator and the event channel.
pub struct SubscriptionManager<R, T> {
	client: Arc<dyn SearchClient<R, T>>,
	strategy: String,
	tx: Sender<EventEnvelope<T>>,
	rx: Receiver<EventEnvelope<T>>,
	next_id: u64,
	stats: SubscriptionStats,
}

impl<R, T: Send + 'static> SubscriptionManager<R, T> {
	pub fn new(client: Arc<dyn SearchClient<R, T>>, strategy: impl Into<String>) -> Self {
		let (tx, rx) = mpsc::channel();
		Self {
			client,
			strategy: strategy.into(),
			tx,
			rx,
			next_id: 0,
			stats: SubscriptionStats::default(),
		}
	}

	#[must_use]
	pub fn strategy(&self) -> &str {
		&self.strategy
	}

	pub fn set_strategy(&mut self, strategy: impl Into<String>) {
		self.strategy = strategy.into();
	}

	#[must_use]
	pub fn stats(&self) -> SubscriptionStats {
		self.stats
	}

	/// Start a search for `request` and return the handle owning it.
	pub fn issue(&mut self, request: Arc<R>) -> Handle {
		self.next_id = self.next_id.saturating_add(1);
		let id = self.next_id;
		let controller = AbortController::new();
		let options = SearchOptions {
			strategy: self.strategy.clone(),
			abort_signal: controller.signal(),
		};
		let stream = ResponseStream::new(self.tx.clone(), id, controller.signal());

		self.stats.issued += 1;
		debug!(id, strategy = %self.strategy, "issuing search");
		self.client.search(request, options, stream);

		Handle {
			id,
			state: HandleState::Active,
			controller,
		}
	}

	/// Unsubscribe from `handle` and ask its operation to stop.
	///
	/// Safe on finished or already cancelled handles. Returns `true` when a
	/// live subscription was cancelled by this call.
	pub fn cancel(&mut self, handle: &mut Handle) -> bool {
		let was_active = handle.is_active();
		if was_active {
			handle.state = HandleState::Cancelled;
			self.stats.cancelled += 1;
			debug!(id = handle.id, "cancelled search");
		}
		if handle.controller.abort() {
			trace!(id = handle.id, "raised abort signal");
		}
		was_active
	}

	/// Mark `handle` as done after its terminal event was applied.
	pub fn finish(&mut self, handle: &mut Handle) {
		if handle.is_active() {
			handle.state = HandleState::Finished;
			self.stats.finished += 1;
			debug!(id = handle.id, "search finished");
		}
	}

	pub fn try_recv(&self) -> Result<EventEnvelope<T>, TryRecvError> {
		self.rx.try_recv()
	}

	pub fn recv_timeout(&self, timeout: Duration) -> Result<EventEnvelope<T>, RecvTimeoutError> {
		self.rx.recv_timeout(timeout)
	}
}
