//! Fakes shared by unit tests.

use std::sync::{Arc, Mutex};

use lookout_stream::{ResponseEvent, ResponseStream};

use crate::notify::{ErrorToast, Notifier};
use crate::search::{SearchClient, SearchOptions};

struct Call<R, T> {
	request: Arc<R>,
	options: SearchOptions,
	stream: ResponseStream<T>,
}

/// Search collaborator that records every call and lets the test push events
/// for any of them later.
pub(crate) struct RecordingClient<R, T> {
	calls: Mutex<Vec<Call<R, T>>>,
}

impl<R, T: Send + 'static> RecordingClient<R, T> {
	pub(crate) fn new() -> Self {
		Self {
			calls: Mutex::new(Vec::new()),
		}
	}

	pub(crate) fn call_count(&self) -> usize {
		self.calls.lock().unwrap().len()
	}

	pub(crate) fn request(&self, call: usize) -> Arc<R> {
		Arc::clone(&self.calls.lock().unwrap()[call].request)
	}

	pub(crate) fn strategy(&self, call: usize) -> Option<String> {
		self.calls
			.lock()
			.unwrap()
			.get(call)
			.map(|call| call.options.strategy.clone())
	}

	pub(crate) fn is_aborted(&self, call: usize) -> bool {
		self.calls.lock().unwrap()[call].options.abort_signal.is_aborted()
	}

	/// Push `event` on the stream of `call`. Returns whether it was sent.
	pub(crate) fn emit(&self, call: usize, event: ResponseEvent<T>) -> bool {
		self.calls.lock().unwrap()[call].stream.send(event)
	}

	/// Calls that are neither aborted nor finished by a terminal event.
	pub(crate) fn live_count(&self) -> usize {
		self.calls
			.lock()
			.unwrap()
			.iter()
			.filter(|call| !call.options.abort_signal.is_aborted() && !call.stream.is_sealed())
			.count()
	}
}

impl<R, T> SearchClient<R, T> for RecordingClient<R, T>
where
	R: Send + Sync,
	T: Send + 'static,
{
	fn search(&self, request: Arc<R>, options: SearchOptions, stream: ResponseStream<T>) {
		self.calls.lock().unwrap().push(Call {
			request,
			options,
			stream,
		});
	}
}

/// Notifier that keeps every notification for later assertions.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
	errors: Mutex<Vec<(String, String)>>,
	warnings: Mutex<Vec<String>>,
}

impl RecordingNotifier {
	/// `(title, message)` pairs of error notifications.
	pub(crate) fn errors(&self) -> Vec<(String, String)> {
		self.errors.lock().unwrap().clone()
	}

	pub(crate) fn warnings(&self) -> Vec<String> {
		self.warnings.lock().unwrap().clone()
	}
}

impl Notifier for RecordingNotifier {
	fn add_error(&self, message: &str, toast: ErrorToast<'_>) {
		self.errors
			.lock()
			.unwrap()
			.push((toast.title.to_string(), message.to_string()));
	}

	fn add_warning(&self, message: &str) {
		self.warnings.lock().unwrap().push(message.to_string());
	}
}
