//! Folds response events into result state.
//!
//! Each subscription gets its own [`ResponseReducer`]. The reducer moves from
//! `Pending` to `Terminal` on the first `Complete` or `Error` event and
//! ignores everything after that, so a late delivery racing a cancellation
//! can never touch the state.

use chrono::{DateTime, Utc};
use lookout_stream::ResponseEvent;
use serde::Serialize;

use crate::error::{MALFORMED_RESPONSE_MESSAGE, SearchError};
use crate::search::DEFAULT_STRATEGY;

/// Describes one kind of search: what it asks, what comes back and how the
/// answer lands in result state.
pub trait SearchQuery {
	type Request: PartialEq + Send + Sync + 'static;
	type Response: Send + 'static;
	type Data: Default;

	/// Stable identifier used when reporting on the query.
	const ID: &'static str;
	/// Strategy requested from the search collaborator.
	const STRATEGY: &'static str = DEFAULT_STRATEGY;
	/// Title of the error notification raised on failure.
	const ERROR_TITLE: &'static str;

	/// Apply interim data. Returns whether `data` changed.
	///
	/// Queries without incremental fields keep the default, which ignores
	/// partial responses.
	fn apply_partial(
		&self,
		_data: &mut Self::Data,
		_response: Self::Response,
	) -> Result<bool, SearchError> {
		Ok(false)
	}

	/// Copy the final payload into `data`.
	///
	/// Implementations validate before writing so a rejected payload leaves
	/// `data` untouched.
	fn apply_complete(
		&self,
		data: &mut Self::Data,
		response: Self::Response,
	) -> Result<(), SearchError>;
}

/// State observed by consumers of a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultState<D> {
	pub loading: bool,
	pub data: D,
	pub error_message: Option<String>,
	/// When the last complete response was applied.
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Pending,
	Terminal,
}

/// Effect of feeding one event to a reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduction {
	/// Nothing changed.
	Ignored,
	/// Interim data was applied.
	Updated,
	/// Final data was applied.
	Completed,
	/// The subscription failed. `malformed` marks payloads that could not be
	/// interpreted, as opposed to errors reported by the search itself.
	Failed { message: String, malformed: bool },
}

impl Reduction {
	#[must_use]
	pub fn is_terminal(&self) -> bool {
		matches!(self, Reduction::Completed | Reduction::Failed { .. })
	}
}

/// Per-subscription state machine.
#[derive(Debug)]
pub struct ResponseReducer {
	phase: Phase,
}

impl Default for ResponseReducer {
	fn default() -> Self {
		Self {
			phase: Phase::Pending,
		}
	}
}

impl ResponseReducer {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn phase(&self) -> Phase {
		self.phase
	}

	#[must_use]
	pub fn is_terminal(&self) -> bool {
		self.phase == Phase::Terminal
	}

	/// Apply `event` to `state`.
	pub fn reduce<Q: SearchQuery>(
		&mut self,
		query: &Q,
		state: &mut ResultState<Q::Data>,
		event: ResponseEvent<Q::Response>,
	) -> Reduction {
		if self.is_terminal() {
			return Reduction::Ignored;
		}

		match event {
			ResponseEvent::Partial(response) => {
				match query.apply_partial(&mut state.data, response) {
					Ok(true) => Reduction::Updated,
					Ok(false) => Reduction::Ignored,
					Err(err) => self.reject(state, &err),
				}
			}
			ResponseEvent::Complete(response) => {
				match query.apply_complete(&mut state.data, response) {
					Ok(()) => {
						self.phase = Phase::Terminal;
						state.loading = false;
						state.error_message = None;
						state.updated_at = Some(Utc::now());
						Reduction::Completed
					}
					Err(err) => self.reject(state, &err),
				}
			}
			ResponseEvent::Error(message) => {
				self.phase = Phase::Terminal;
				state.loading = false;
				state.error_message = Some(message.clone());
				Reduction::Failed {
					message,
					malformed: false,
				}
			}
		}
	}

	fn reject<D>(&mut self, state: &mut ResultState<D>, err: &SearchError) -> Reduction {
		tracing::debug!(error = %err, "rejected search response");
		self.phase = Phase::Terminal;
		state.loading = false;
		state.error_message = Some(MALFORMED_RESPONSE_MESSAGE.to_string());
		Reduction::Failed {
			message: MALFORMED_RESPONSE_MESSAGE.to_string(),
			malformed: true,
		}
	}
}
