use serde_json::Value;

use super::corpus::Corpus;
use crate::error::SearchError;

/// A query bound to its response stream, ready to run on the worker.
pub(crate) trait QueryJob: Send {
	/// Execute against the corpus and report through the bound stream.
	fn run(self: Box<Self>, corpus: &Corpus);

	/// Report a failure without running.
	fn fail(self: Box<Self>, error: SearchError);
}

/// Commands understood by the background search worker.
pub(crate) enum SearchCommand {
	/// Execute a query.
	Run(Box<dyn QueryJob>),
	/// Merge documents into an index of the in-memory corpus.
	Index {
		index: String,
		documents: Vec<Value>,
	},
	/// Stop the background worker thread.
	Shutdown,
}
