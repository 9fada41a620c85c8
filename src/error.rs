use std::path::PathBuf;

use thiserror::Error;

/// Message recorded in result state when a response cannot be interpreted.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "unexpected response from search";

/// Failures surfaced while executing or interpreting a search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
	/// The operation stopped because its abort signal was raised.
	#[error("search was aborted")]
	Aborted,

	/// The collaborator does not serve the requested strategy.
	#[error("unknown search strategy '{strategy}'")]
	UnknownStrategy { strategy: String },

	/// The search backend is no longer reachable.
	#[error("search backend unavailable: {reason}")]
	Unavailable { reason: String },

	/// The response payload does not have the expected shape.
	#[error("malformed search response: {reason}")]
	Malformed { reason: String },
}

impl SearchError {
	pub fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed {
			reason: reason.into(),
		}
	}
}

/// Errors raised while loading a search corpus from disk.
#[derive(Debug, Error)]
pub enum CorpusError {
	#[error("failed to read corpus {path}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse corpus {path}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}
