//! Streaming primitives for delivering search response events across threads.
//!
//! A search producer owns a [`ResponseStream`] bound to one subscription id
//! and pushes [`ResponseEvent`]s through an [`mpsc`] channel. The consumer
//! drains [`StreamEnvelope`]s on its own thread and decides, by id, whether
//! the event still belongs to the subscription it cares about.
//!
//! ```
//! use std::sync::mpsc;
//!
//! use lookout_stream::{AbortController, ResponseEvent, ResponseStream};
//!
//! let (tx, rx) = mpsc::channel();
//! let controller = AbortController::new();
//! let stream = ResponseStream::new(tx, 7, controller.signal());
//! assert!(stream.partial(1_u32));
//! assert!(stream.complete(2));
//! assert!(!stream.error("late"));
//!
//! let events: Vec<_> = rx.try_iter().map(|envelope| envelope.payload).collect();
//! assert_eq!(events, vec![ResponseEvent::Partial(1), ResponseEvent::Complete(2)]);
//! ```
//! [`mpsc`]: std::sync::mpsc

mod abort;

use std::cell::Cell;
use std::fmt;
use std::sync::mpsc::Sender;

pub use abort::{AbortController, AbortSignal};

/// One message in a search response stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseEvent<T> {
	/// Interim data; more events follow.
	Partial(T),
	/// Final data. Terminal.
	Complete(T),
	/// Failure with a human readable message. Terminal.
	Error(String),
}

impl<T> ResponseEvent<T> {
	/// Whether no further events may follow this one.
	#[must_use]
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Partial(_))
	}

	/// Transform the carried data while keeping the variant.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEvent<U> {
		match self {
			Self::Partial(data) => ResponseEvent::Partial(f(data)),
			Self::Complete(data) => ResponseEvent::Complete(f(data)),
			Self::Error(message) => ResponseEvent::Error(message),
		}
	}
}

/// Message emitted by a producer and delivered to the consumer.
#[derive(Debug)]
pub struct StreamEnvelope<P> {
	/// Identifier of the subscription that produced the payload.
	pub id: u64,
	/// Payload delivered to the consumer.
	pub payload: P,
}

impl<P> StreamEnvelope<P> {
	/// Transform the payload while preserving the envelope id.
	pub fn map_payload<N>(self, f: impl FnOnce(P) -> N) -> StreamEnvelope<N> {
		StreamEnvelope {
			id: self.id,
			payload: f(self.payload),
		}
	}
}

/// Envelope carrying a single response event.
pub type EventEnvelope<T> = StreamEnvelope<ResponseEvent<T>>;

/// Producer handle for exactly one subscription.
///
/// The stream seals itself after the first terminal event; anything sent
/// afterwards is dropped and reported as undelivered.
pub struct ResponseStream<T> {
	tx: Sender<EventEnvelope<T>>,
	id: u64,
	signal: AbortSignal,
	sealed: Cell<bool>,
}

impl<T: Send + 'static> ResponseStream<T> {
	/// Create a producer handle for subscription `id`.
	#[must_use]
	pub fn new(tx: Sender<EventEnvelope<T>>, id: u64, signal: AbortSignal) -> Self {
		Self {
			tx,
			id,
			signal,
			sealed: Cell::new(false),
		}
	}

	/// Identifier of the subscription this stream reports for.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Abort signal of the underlying operation.
	#[must_use]
	pub fn signal(&self) -> &AbortSignal {
		&self.signal
	}

	/// Whether the consumer asked the operation to stop.
	#[must_use]
	pub fn is_aborted(&self) -> bool {
		self.signal.is_aborted()
	}

	/// Whether a terminal event has already been sent.
	#[must_use]
	pub fn is_sealed(&self) -> bool {
		self.sealed.get()
	}

	/// Emit interim data.
	pub fn partial(&self, data: T) -> bool {
		self.send(ResponseEvent::Partial(data))
	}

	/// Emit the final data and seal the stream.
	pub fn complete(&self, data: T) -> bool {
		self.send(ResponseEvent::Complete(data))
	}

	/// Emit a failure and seal the stream.
	pub fn error(&self, message: impl Into<String>) -> bool {
		self.send(ResponseEvent::Error(message.into()))
	}

	/// Emit an arbitrary event, sealing the stream when it is terminal.
	pub fn send(&self, event: ResponseEvent<T>) -> bool {
		if self.sealed.get() {
			return false;
		}
		if event.is_terminal() {
			self.sealed.set(true);
		}
		self.tx
			.send(StreamEnvelope {
				id: self.id,
				payload: event,
			})
			.is_ok()
	}
}

impl<T> fmt::Debug for ResponseStream<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResponseStream")
			.field("id", &self.id)
			.field("aborted", &self.signal.is_aborted())
			.field("sealed", &self.sealed.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;

	use super::*;

	#[test]
	fn envelopes_carry_subscription_id() {
		let (tx, rx) = mpsc::channel();
		let stream = ResponseStream::new(tx, 42, AbortController::new().signal());
		assert!(stream.partial("chunk"));

		let envelope = rx.recv().unwrap();
		assert_eq!(envelope.id, 42);
		assert_eq!(envelope.payload, ResponseEvent::Partial("chunk"));
	}

	#[test]
	fn error_seals_the_stream() {
		let (tx, rx) = mpsc::channel::<EventEnvelope<u8>>();
		let stream = ResponseStream::new(tx, 1, AbortController::new().signal());
		assert!(stream.error("timeout"));
		assert!(stream.is_sealed());
		assert!(!stream.partial(3));
		assert!(!stream.complete(4));

		let events: Vec<_> = rx.try_iter().map(|envelope| envelope.payload).collect();
		assert_eq!(events, vec![ResponseEvent::Error("timeout".into())]);
	}

	#[test]
	fn send_reports_disconnected_consumer() {
		let (tx, rx) = mpsc::channel::<EventEnvelope<u8>>();
		drop(rx);
		let stream = ResponseStream::new(tx, 1, AbortController::new().signal());
		assert!(!stream.partial(1));
	}

	#[test]
	fn stream_observes_abort() {
		let (tx, _rx) = mpsc::channel::<EventEnvelope<u8>>();
		let controller = AbortController::new();
		let stream = ResponseStream::new(tx, 1, controller.signal());
		assert!(!stream.is_aborted());
		controller.abort();
		assert!(stream.is_aborted());
	}

	#[test]
	fn map_keeps_variant() {
		let event = ResponseEvent::Complete(2).map(|value| value * 10);
		assert_eq!(event, ResponseEvent::Complete(20));
		let error: ResponseEvent<u8> = ResponseEvent::Error("boom".into());
		assert_eq!(error.map(|v| v + 1), ResponseEvent::Error("boom".into()));
	}
}
