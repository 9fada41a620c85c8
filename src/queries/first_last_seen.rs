//! Earliest or latest appearance of an entity, e.g. when a host was first
//! seen in the event indices.

use chrono::{DateTime, FixedOffset};
use lookout_stream::ResponseStream;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TIMESTAMP_FIELD;
use crate::error::SearchError;
use crate::reducer::SearchQuery;
use crate::request::{Direction, DocValueField};
use crate::search::{Corpus, LocalQuery, ScanTuning, field_matches, field_value, scan_chunks};

/// Which entity to look up and in which direction to sort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstLastSeenRequest {
	pub default_index: Vec<String>,
	pub doc_value_fields: Vec<DocValueField>,
	pub field: String,
	pub value: String,
	pub order: Direction,
}

impl FirstLastSeenRequest {
	pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			default_index: Vec::new(),
			doc_value_fields: Vec::new(),
			field: field.into(),
			value: value.into(),
			order: Direction::Asc,
		}
	}

	#[must_use]
	pub fn with_indices<I, S>(mut self, indices: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.default_index = indices.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_order(mut self, order: Direction) -> Self {
		self.order = order;
		self
	}

	#[must_use]
	pub fn with_doc_value_fields(mut self, fields: Vec<DocValueField>) -> Self {
		self.doc_value_fields = fields;
		self
	}

	/// Render the request as a search DSL body.
	#[must_use]
	pub fn to_dsl(&self) -> Value {
		let mut body = json!({
			"query": { "bool": { "filter": [ { "term": { self.field.as_str(): self.value } } ] } },
			"_source": false,
			"fields": [ { "field": TIMESTAMP_FIELD, "format": "strict_date_optional_time" } ],
			"size": 1,
			"sort": [ { TIMESTAMP_FIELD: { "order": self.order } } ],
		});
		if !self.doc_value_fields.is_empty() {
			body["docvalue_fields"] = json!(self.doc_value_fields);
		}

		json!({
			"allow_no_indices": true,
			"index": self.default_index,
			"ignore_unavailable": true,
			"track_total_hits": false,
			"body": body,
		})
	}
}

/// First and last appearance timestamps. A search fills the one matching its
/// sort order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstLastSeen {
	pub first_seen: Option<String>,
	pub last_seen: Option<String>,
}

/// Reducer side of the first/last seen lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLastSeenQuery;

impl SearchQuery for FirstLastSeenQuery {
	type Request = FirstLastSeenRequest;
	type Response = FirstLastSeen;
	type Data = FirstLastSeen;

	const ID: &'static str = "firstLastSeenHostQuery";
	const ERROR_TITLE: &'static str = "Failed to query first and last seen";

	fn apply_complete(
		&self,
		data: &mut FirstLastSeen,
		response: FirstLastSeen,
	) -> Result<(), SearchError> {
		*data = response;
		Ok(())
	}
}

impl LocalQuery for FirstLastSeenRequest {
	type Response = FirstLastSeen;

	fn execute(
		&self,
		corpus: &Corpus,
		tuning: &ScanTuning,
		stream: &ResponseStream<FirstLastSeen>,
	) -> Result<FirstLastSeen, SearchError> {
		let documents = corpus.documents(&self.default_index);
		let mut best: Option<(DateTime<FixedOffset>, &str)> = None;

		scan_chunks(&documents, tuning, stream, |chunk| {
			for document in chunk {
				if !field_matches(document, &self.field, &self.value) {
					continue;
				}
				let Some(raw) = field_value(document, TIMESTAMP_FIELD).and_then(Value::as_str)
				else {
					continue;
				};
				let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) else {
					continue;
				};
				let better = match best {
					None => true,
					Some((current, _)) => match self.order {
						Direction::Asc => timestamp < current,
						Direction::Desc => timestamp > current,
					},
				};
				if better {
					best = Some((timestamp, raw));
				}
			}
			None
		})?;

		let seen = best.map(|(_, raw)| raw.to_string());
		Ok(match self.order {
			Direction::Asc => FirstLastSeen {
				first_seen: seen,
				last_seen: None,
			},
			Direction::Desc => FirstLastSeen {
				first_seen: None,
				last_seen: seen,
			},
		})
	}
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;

	use lookout_stream::AbortController;

	use super::*;

	fn corpus() -> Corpus {
		let mut corpus = Corpus::new();
		corpus.insert(
			"logs-2020",
			vec![
				json!({"host": {"name": "alpha"}, "@timestamp": "2020-01-05T10:00:00Z"}),
				json!({"host": {"name": "alpha"}, "@timestamp": "2020-01-01T00:00:00Z"}),
				json!({"host": {"name": "beta"}, "@timestamp": "2019-06-01T00:00:00Z"}),
				json!({"host": {"name": "alpha"}, "@timestamp": "not a date"}),
			],
		);
		corpus.insert(
			"logs-2021",
			vec![json!({"host.name": "alpha", "@timestamp": "2021-02-01T00:00:00+00:00"})],
		);
		corpus
	}

	fn execute(request: &FirstLastSeenRequest) -> FirstLastSeen {
		let (tx, _rx) = mpsc::channel();
		let stream = ResponseStream::new(tx, 1, AbortController::new().signal());
		request
			.execute(&corpus(), &ScanTuning::default(), &stream)
			.unwrap()
	}

	#[test]
	fn ascending_order_finds_first_seen() {
		let request = FirstLastSeenRequest::new("host.name", "alpha").with_indices(["logs-*"]);
		assert_eq!(
			execute(&request),
			FirstLastSeen {
				first_seen: Some("2020-01-01T00:00:00Z".into()),
				last_seen: None,
			}
		);
	}

	#[test]
	fn descending_order_finds_last_seen() {
		let request = FirstLastSeenRequest::new("host.name", "alpha")
			.with_indices(["logs-*"])
			.with_order(Direction::Desc);
		assert_eq!(
			execute(&request),
			FirstLastSeen {
				first_seen: None,
				last_seen: Some("2021-02-01T00:00:00+00:00".into()),
			}
		);
	}

	#[test]
	fn unknown_entity_yields_empty_result() {
		let request = FirstLastSeenRequest::new("host.name", "gamma").with_indices(["logs-*"]);
		assert_eq!(execute(&request), FirstLastSeen::default());
	}

	#[test]
	fn dsl_filters_on_term_and_sorts_by_timestamp() {
		let request = FirstLastSeenRequest::new("host.name", "alpha")
			.with_indices(["auditbeat-*", "logs-*"])
			.with_order(Direction::Desc);
		let dsl = request.to_dsl();

		assert_eq!(dsl["index"], json!(["auditbeat-*", "logs-*"]));
		assert_eq!(dsl["allow_no_indices"], json!(true));
		assert_eq!(dsl["track_total_hits"], json!(false));
		assert_eq!(
			dsl["body"]["query"]["bool"]["filter"][0]["term"]["host.name"],
			json!("alpha")
		);
		assert_eq!(dsl["body"]["sort"][0]["@timestamp"]["order"], json!("desc"));
		assert_eq!(dsl["body"]["size"], json!(1));
		assert!(dsl["body"].get("docvalue_fields").is_none());
	}

	#[test]
	fn dsl_includes_doc_value_fields_when_present() {
		let request = FirstLastSeenRequest::new("host.name", "alpha").with_doc_value_fields(vec![
			DocValueField::new("@timestamp").with_format("date_time"),
		]);
		let dsl = request.to_dsl();
		assert_eq!(
			dsl["body"]["docvalue_fields"],
			json!([{ "field": "@timestamp", "format": "date_time" }])
		);
	}

	#[test]
	fn request_serializes_with_camel_case_keys() {
		let request = FirstLastSeenRequest::new("host.name", "alpha").with_indices(["logs-*"]);
		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(value["defaultIndex"], json!(["logs-*"]));
		assert_eq!(value["order"], json!("asc"));
	}
}
