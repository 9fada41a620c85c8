//! Lifecycle controller for a single search consumer.
//!
//! A [`SearchHook`] sequences request changes with subscription calls: every
//! new request cancels the previous handle before issuing its own, so at most
//! one search is live per hook. Events are drained on the owner's thread via
//! [`SearchHook::pump`] or [`SearchHook::wait`], and only events of the
//! current, non-terminal handle reach the result state.

use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use lookout_stream::EventEnvelope;
use tracing::{debug, trace};

use crate::notify::{ErrorToast, Notifier};
use crate::reducer::{Reduction, ResponseReducer, ResultState, SearchQuery};
use crate::request::RequestBuilder;
use crate::search::{Handle, SearchClient, SubscriptionManager, SubscriptionStats};

/// The subscription currently attributed to the hook.
struct ActiveSubscription<R> {
	handle: Handle,
	reducer: ResponseReducer,
	request: Arc<R>,
}

/// Owns the result state of one search consumer.
pub struct SearchHook<Q: SearchQuery> {
	query: Q,
	builder: RequestBuilder<Q::Request>,
	subscriptions: SubscriptionManager<Q::Request, Q::Response>,
	notifier: Arc<dyn Notifier>,
	active: Option<ActiveSubscription<Q::Request>>,
	state: ResultState<Q::Data>,
	skip: bool,
	disposed: bool,
}

impl<Q: SearchQuery> SearchHook<Q> {
	pub fn new(
		query: Q,
		client: Arc<dyn SearchClient<Q::Request, Q::Response>>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			query,
			builder: RequestBuilder::new(),
			subscriptions: SubscriptionManager::new(client, Q::STRATEGY),
			notifier,
			active: None,
			state: ResultState::default(),
			skip: false,
			disposed: false,
		}
	}

	/// Request searches through `strategy` instead of the query's default.
	#[must_use]
	pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
		self.subscriptions.set_strategy(strategy);
		self
	}

	/// Start out skipped: requests are remembered but not issued.
	#[must_use]
	pub fn skipped(mut self) -> Self {
		self.skip = true;
		self
	}

	/// Issue the first request.
	pub fn start(&mut self, initial: Q::Request) -> bool {
		self.on_input_change(initial)
	}

	/// Record new inputs, issuing a search only when the request changed
	/// structurally. Returns whether a search was issued.
	pub fn on_input_change(&mut self, next: Q::Request) -> bool {
		if self.disposed {
			return false;
		}

		let request = self.builder.build(next);
		let unchanged = self
			.active
			.as_ref()
			.is_some_and(|active| Arc::ptr_eq(&active.request, &request));
		if unchanged || self.skip {
			trace!(query = Q::ID, unchanged, skip = self.skip, "not issuing search");
			return false;
		}

		self.issue(request);
		true
	}

	/// Re-issue the current request even though it did not change.
	pub fn refetch(&mut self) -> bool {
		if self.disposed || self.skip {
			return false;
		}
		match self.builder.current().cloned() {
			Some(request) => {
				self.issue(request);
				true
			}
			None => false,
		}
	}

	/// Pause or resume searching.
	///
	/// Pausing cancels the live search. Resuming always re-issues the latest
	/// request, even one that completed before the pause.
	pub fn set_skip(&mut self, skip: bool) {
		if self.disposed || self.skip == skip {
			return;
		}
		self.skip = skip;

		if skip {
			if let Some(mut active) = self.active.take() {
				self.subscriptions.cancel(&mut active.handle);
			}
			self.state.loading = false;
			return;
		}

		if let Some(request) = self.builder.current().cloned() {
			self.issue(request);
		}
	}

	/// Apply every event already delivered. Returns how many changed state.
	pub fn pump(&mut self) -> usize {
		let mut applied = 0;
		loop {
			match self.subscriptions.try_recv() {
				Ok(envelope) => {
					if self.dispatch(envelope) {
						applied += 1;
					}
				}
				Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
			}
		}
		applied
	}

	/// Block until the current search settles or `timeout` elapses.
	///
	/// Returns `true` once nothing is loading.
	pub fn wait(&mut self, timeout: Duration) -> bool {
		let deadline = Instant::now() + timeout;
		while self.is_loading() {
			let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
				return false;
			};
			match self.subscriptions.recv_timeout(remaining) {
				Ok(envelope) => {
					self.dispatch(envelope);
				}
				Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
					return false;
				}
			}
		}
		true
	}

	/// Tear down: cancel the current handle and stop reacting to events.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		if let Some(mut active) = self.active.take() {
			self.subscriptions.cancel(&mut active.handle);
		}
		self.state.loading = false;
		debug!(query = Q::ID, "search hook disposed");
	}

	#[must_use]
	pub fn state(&self) -> &ResultState<Q::Data> {
		&self.state
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.state.loading
	}

	#[must_use]
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	#[must_use]
	pub fn current_request(&self) -> Option<&Arc<Q::Request>> {
		self.builder.current()
	}

	#[must_use]
	pub fn stats(&self) -> SubscriptionStats {
		self.subscriptions.stats()
	}

	fn issue(&mut self, request: Arc<Q::Request>) {
		if let Some(mut previous) = self.active.take() {
			self.subscriptions.cancel(&mut previous.handle);
		}
		self.state.loading = true;
		let handle = self.subscriptions.issue(Arc::clone(&request));
		debug!(query = Q::ID, id = handle.id(), "search started");
		self.active = Some(ActiveSubscription {
			handle,
			reducer: ResponseReducer::new(),
			request,
		});
	}

	fn dispatch(&mut self, envelope: EventEnvelope<Q::Response>) -> bool {
		if self.disposed {
			return false;
		}
		let Some(active) = self.active.as_mut() else {
			trace!(query = Q::ID, id = envelope.id, "dropping event without subscription");
			return false;
		};
		if active.handle.id() != envelope.id {
			trace!(query = Q::ID, id = envelope.id, current = active.handle.id(), "dropping stale event");
			return false;
		}

		let reduction = active
			.reducer
			.reduce(&self.query, &mut self.state, envelope.payload);
		if reduction.is_terminal() {
			self.subscriptions.finish(&mut active.handle);
		}

		match reduction {
			Reduction::Ignored => false,
			Reduction::Updated | Reduction::Completed => true,
			Reduction::Failed { message, malformed } => {
				if malformed {
					self.notifier.add_warning(&message);
				} else {
					self.notifier.add_error(
						&message,
						ErrorToast {
							title: Q::ERROR_TITLE,
						},
					);
				}
				true
			}
		}
	}
}

impl<Q: SearchQuery> Drop for SearchHook<Q> {
	fn drop(&mut self) {
		self.dispose();
	}
}
