//! Number of documents in a time range, reported incrementally while the
//! search walks the indices.

use chrono::{DateTime, Utc};
use lookout_stream::ResponseStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TIMESTAMP_FIELD, parse_timestamp};
use crate::error::SearchError;
use crate::reducer::SearchQuery;
use crate::search::{Corpus, LocalQuery, ScanTuning, field_value, scan_chunks};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCountRequest {
	pub index_names: Vec<String>,
	pub from: Option<DateTime<Utc>>,
	pub to: Option<DateTime<Utc>>,
}

impl TotalCountRequest {
	pub fn new<I, S>(index_names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			index_names: index_names.into_iter().map(Into::into).collect(),
			from: None,
			to: None,
		}
	}

	/// Only count documents whose timestamp falls in `from..=to`.
	#[must_use]
	pub fn within(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
		self.from = Some(from);
		self.to = Some(to);
		self
	}

	fn admits(&self, document: &Value) -> bool {
		if self.from.is_none() && self.to.is_none() {
			return true;
		}
		let Some(timestamp) = field_value(document, TIMESTAMP_FIELD).and_then(parse_timestamp) else {
			return false;
		};
		self.from.is_none_or(|from| timestamp >= from) && self.to.is_none_or(|to| timestamp <= to)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalCount {
	pub count: u64,
}

/// Reducer side of the total count. Partial counts are shown while loading.
#[derive(Clone, Copy, Debug, Default)]
pub struct TotalCountQuery;

impl SearchQuery for TotalCountQuery {
	type Request = TotalCountRequest;
	type Response = TotalCount;
	type Data = TotalCount;

	const ID: &'static str = "indicatorsTotalCount";
	const ERROR_TITLE: &'static str = "Failed to count indicators";

	fn apply_partial(&self, data: &mut TotalCount, response: TotalCount) -> Result<bool, SearchError> {
		let changed = *data != response;
		*data = response;
		Ok(changed)
	}

	fn apply_complete(&self, data: &mut TotalCount, response: TotalCount) -> Result<(), SearchError> {
		*data = response;
		Ok(())
	}
}

impl LocalQuery for TotalCountRequest {
	type Response = TotalCount;

	fn execute(
		&self,
		corpus: &Corpus,
		tuning: &ScanTuning,
		stream: &ResponseStream<TotalCount>,
	) -> Result<TotalCount, SearchError> {
		let documents = corpus.documents(&self.index_names);
		let mut count = 0_u64;
		scan_chunks(&documents, tuning, stream, |chunk| {
			count += chunk.iter().filter(|document| self.admits(document)).count() as u64;
			Some(TotalCount { count })
		})?;
		Ok(TotalCount { count })
	}
}
