use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner side of a cooperative cancellation flag.
#[derive(Debug, Default)]
pub struct AbortController {
	flag: Arc<AtomicBool>,
}

impl AbortController {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Signal handed to the operation so it can poll for cancellation.
	#[must_use]
	pub fn signal(&self) -> AbortSignal {
		AbortSignal {
			flag: Arc::clone(&self.flag),
		}
	}

	/// Request the operation to stop.
	///
	/// Returns `true` only for the call that actually raised the flag.
	pub fn abort(&self) -> bool {
		!self.flag.swap(true, Ordering::AcqRel)
	}

	#[must_use]
	pub fn is_aborted(&self) -> bool {
		self.flag.load(Ordering::Acquire)
	}
}

/// Read-only view of an [`AbortController`]. Advisory: producers may still
/// deliver a final event after observing it.
#[derive(Clone, Debug)]
pub struct AbortSignal {
	flag: Arc<AtomicBool>,
}

impl AbortSignal {
	#[must_use]
	pub fn is_aborted(&self) -> bool {
		self.flag.load(Ordering::Acquire)
	}
}
