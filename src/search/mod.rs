//! Search collaborator contract, subscription bookkeeping and the in-process
//! search backend.

mod commands;
mod corpus;
mod local;
mod scan;
mod subscription;
mod worker;

use std::sync::Arc;

use lookout_stream::{AbortSignal, ResponseStream};

pub(crate) use corpus::field_matches;
pub use corpus::{Corpus, field_value};
pub use local::{LocalQuery, LocalSearch};
pub use scan::{SCAN_CHUNK_SIZE, ScanTuning, scan_chunks};
pub use subscription::{Handle, HandleState, SubscriptionManager, SubscriptionStats};

/// Strategy name served by [`LocalSearch`] unless configured otherwise.
pub const DEFAULT_STRATEGY: &str = "securitySolutionSearchStrategy";

/// Per-call options handed to the search collaborator.
#[derive(Clone, Debug)]
pub struct SearchOptions {
	/// Backend strategy that should execute the request.
	pub strategy: String,
	/// Raised when the caller no longer wants the result.
	pub abort_signal: AbortSignal,
}

/// External service that executes a request and reports progress as a stream
/// of response events.
///
/// Implementations must not fail synchronously: every failure is reported as
/// a terminal [`ResponseEvent::Error`](lookout_stream::ResponseEvent::Error)
/// on `stream`. The stream accepts zero or more partial events followed by
/// one terminal event.
pub trait SearchClient<R, T>: Send + Sync {
	fn search(&self, request: Arc<R>, options: SearchOptions, stream: ResponseStream<T>);
}
