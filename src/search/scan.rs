use std::thread;
use std::time::Duration;

use lookout_stream::ResponseStream;
use serde_json::Value;

use crate::error::SearchError;

/// Number of documents examined between abort checks.
pub const SCAN_CHUNK_SIZE: usize = 512;

/// Controls how the local backend walks a document set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTuning {
	pub chunk_size: usize,
	/// Pause after every chunk. Zero outside of demos and tests.
	pub chunk_delay: Duration,
}

impl Default for ScanTuning {
	fn default() -> Self {
		Self {
			chunk_size: SCAN_CHUNK_SIZE,
			chunk_delay: Duration::ZERO,
		}
	}
}

/// Walk `documents` chunk by chunk, polling the stream's abort signal before
/// each chunk and forwarding whatever `on_chunk` yields as a partial event.
pub fn scan_chunks<'a, T, F>(
	documents: &[&'a Value],
	tuning: &ScanTuning,
	stream: &ResponseStream<T>,
	mut on_chunk: F,
) -> Result<(), SearchError>
where
	T: Send + 'static,
	F: FnMut(&[&'a Value]) -> Option<T>,
{
	for chunk in documents.chunks(tuning.chunk_size.max(1)) {
		if stream.is_aborted() {
			return Err(SearchError::Aborted);
		}
		if let Some(partial) = on_chunk(chunk) {
			if !stream.partial(partial) {
				return Err(SearchError::Unavailable {
					reason: "consumer disconnected".into(),
				});
			}
		}
		if !tuning.chunk_delay.is_zero() {
			thread::sleep(tuning.chunk_delay);
		}
	}

	if stream.is_aborted() {
		return Err(SearchError::Aborted);
	}
	Ok(())
}
