//! In-process search backend.
//!
//! [`LocalSearch`] serves requests from a background worker thread over an
//! in-memory [`Corpus`]. Queries run one at a time in issue order; a
//! superseded query notices its raised abort signal at the next chunk
//! boundary and stops early.

use std::sync::Arc;
use std::sync::mpsc::{SendError, Sender};

use lookout_stream::ResponseStream;
use serde_json::Value;
use tracing::{debug, warn};

use super::commands::{QueryJob, SearchCommand};
use super::corpus::Corpus;
use super::scan::ScanTuning;
use super::worker;
use super::{DEFAULT_STRATEGY, SearchClient, SearchOptions};
use crate::error::SearchError;

/// Request types the local backend knows how to execute.
pub trait LocalQuery: Send + Sync + 'static {
	type Response: Send + 'static;

	/// Run the query. Partial events go through `stream`; the final payload is
	/// returned and delivered by the caller.
	fn execute(
		&self,
		corpus: &Corpus,
		tuning: &ScanTuning,
		stream: &ResponseStream<Self::Response>,
	) -> Result<Self::Response, SearchError>;
}

struct Job<Q: LocalQuery> {
	request: Arc<Q>,
	tuning: ScanTuning,
	stream: ResponseStream<Q::Response>,
}

impl<Q: LocalQuery> QueryJob for Job<Q> {
	fn run(self: Box<Self>, corpus: &Corpus) {
		let Job {
			request,
			tuning,
			stream,
		} = *self;
		match request.execute(corpus, &tuning, &stream) {
			Ok(response) => {
				stream.complete(response);
			}
			Err(SearchError::Aborted) => {
				debug!(id = stream.id(), "search aborted");
				stream.error(SearchError::Aborted.to_string());
			}
			Err(err) => {
				warn!(id = stream.id(), error = %err, "search failed");
				stream.error(err.to_string());
			}
		}
	}

	fn fail(self: Box<Self>, error: SearchError) {
		self.stream.error(error.to_string());
	}
}

/// Handle to the background search worker.
pub struct LocalSearch {
	tx: Sender<SearchCommand>,
	tuning: ScanTuning,
	strategies: Vec<String>,
}

impl LocalSearch {
	/// Spawn a worker that owns `corpus` and serves [`DEFAULT_STRATEGY`].
	#[must_use]
	pub fn spawn(corpus: Corpus, tuning: ScanTuning) -> Self {
		Self {
			tx: worker::spawn(corpus),
			tuning,
			strategies: vec![DEFAULT_STRATEGY.to_string()],
		}
	}

	/// Also serve `strategy`.
	#[must_use]
	pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
		let strategy = strategy.into();
		if !self.serves(&strategy) {
			self.strategies.push(strategy);
		}
		self
	}

	#[must_use]
	pub fn serves(&self, strategy: &str) -> bool {
		self.strategies.iter().any(|served| served == strategy)
	}

	/// Merge `documents` into `index`. Queries issued afterwards see them.
	pub fn index(&self, index: impl Into<String>, documents: Vec<Value>) -> Result<(), SearchError> {
		self.tx
			.send(SearchCommand::Index {
				index: index.into(),
				documents,
			})
			.map_err(|_| worker_gone())
	}

	pub fn shutdown(&self) {
		let _ = self.tx.send(SearchCommand::Shutdown);
	}
}

impl Drop for LocalSearch {
	fn drop(&mut self) {
		self.shutdown();
	}
}

fn worker_gone() -> SearchError {
	SearchError::Unavailable {
		reason: "search worker stopped".into(),
	}
}

impl<Q: LocalQuery> SearchClient<Q, Q::Response> for LocalSearch {
	fn search(&self, request: Arc<Q>, options: SearchOptions, stream: ResponseStream<Q::Response>) {
		let job = Box::new(Job {
			request,
			tuning: self.tuning.clone(),
			stream,
		});

		if !self.serves(&options.strategy) {
			job.fail(SearchError::UnknownStrategy {
				strategy: options.strategy,
			});
			return;
		}

		if let Err(SendError(SearchCommand::Run(job))) = self.tx.send(SearchCommand::Run(job)) {
			job.fail(worker_gone());
		}
	}
}
