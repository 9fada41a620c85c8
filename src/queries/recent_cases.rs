//! Most recently created cases within a date range.
//!
//! The search returns raw JSON; parsing happens in the reducer so that an
//! unexpected payload surfaces as a failed search instead of garbage rows.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use lookout_stream::ResponseStream;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::parse_timestamp;
use crate::error::SearchError;
use crate::reducer::SearchQuery;
use crate::request::Direction;
use crate::search::{Corpus, LocalQuery, ScanTuning, field_matches, field_value, scan_chunks};

/// Index holding case documents in the local backend.
pub const CASES_INDEX: &str = ".cases";
pub const DEFAULT_OWNER: &str = "securitySolution";
pub const DEFAULT_SORT_FIELD: &str = "created_at";
pub const DEFAULT_PAGE_SIZE: u32 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCasesRequest {
	pub from: NaiveDate,
	pub to: NaiveDate,
	pub owner: String,
	pub sort_field: String,
	pub sort_order: Direction,
	pub page: u32,
	pub per_page: u32,
}

impl RecentCasesRequest {
	/// Newest cases created between the calendar days of `from` and `to`.
	#[must_use]
	pub fn for_range(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
		Self {
			from: from.date_naive(),
			to: to.date_naive(),
			owner: DEFAULT_OWNER.to_string(),
			sort_field: DEFAULT_SORT_FIELD.to_string(),
			sort_order: Direction::Desc,
			page: 1,
			per_page: DEFAULT_PAGE_SIZE,
		}
	}

	fn admits(&self, document: &Value) -> bool {
		if !field_matches(document, "owner", &self.owner) {
			return false;
		}
		created_on(document).is_some_and(|day| day >= self.from && day <= self.to)
	}

	/// Timestamps compare as instants; anything else compares as text.
	fn compare(&self, left: &Value, right: &Value) -> Ordering {
		let left = field_value(left, &self.sort_field);
		let right = field_value(right, &self.sort_field);
		let ordering = match (left.and_then(parse_timestamp), right.and_then(parse_timestamp)) {
			(Some(left), Some(right)) => left.cmp(&right),
			_ => sort_text(left).cmp(&sort_text(right)),
		};
		match self.sort_order {
			Direction::Asc => ordering,
			Direction::Desc => ordering.reverse(),
		}
	}
}

fn sort_text(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(text)) => text.clone(),
		Some(other) => other.to_string(),
		None => String::new(),
	}
}

fn created_on(document: &Value) -> Option<NaiveDate> {
	parse_timestamp(field_value(document, "created_at")?).map(|created| created.date_naive())
}

#[derive(Debug, Deserialize)]
struct CasesPage {
	cases: Vec<CaseRecord>,
}

#[derive(Debug, Deserialize)]
struct CaseRecord {
	id: String,
	title: String,
	#[serde(default)]
	description: String,
	created_at: String,
	created_by: CaseUser,
	status: String,
}

#[derive(Debug, Deserialize)]
struct CaseUser {
	username: Option<String>,
	full_name: Option<String>,
}

/// Row shown for a recently created case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCaseItem {
	pub id: String,
	pub name: String,
	pub note: String,
	pub created_at: String,
	pub created_by: String,
	pub status: String,
}

impl From<CaseRecord> for RecentCaseItem {
	fn from(record: CaseRecord) -> Self {
		let created_by = record
			.created_by
			.full_name
			.or(record.created_by.username)
			.unwrap_or_default();
		Self {
			id: record.id,
			name: record.title,
			note: record.description,
			created_at: record.created_at,
			created_by,
			status: record.status,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecentCases {
	pub items: Vec<RecentCaseItem>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RecentCasesQuery;

impl SearchQuery for RecentCasesQuery {
	type Request = RecentCasesRequest;
	type Response = Value;
	type Data = RecentCases;

	const ID: &'static str = "recentlyCreatedCases";
	const ERROR_TITLE: &'static str = "Failed to load recent cases";

	fn apply_complete(&self, data: &mut RecentCases, response: Value) -> Result<(), SearchError> {
		let page: CasesPage = serde_json::from_value(response)
			.map_err(|err| SearchError::malformed(err.to_string()))?;
		data.items = page.cases.into_iter().map(RecentCaseItem::from).collect();
		Ok(())
	}
}

impl LocalQuery for RecentCasesRequest {
	type Response = Value;

	fn execute(
		&self,
		corpus: &Corpus,
		tuning: &ScanTuning,
		stream: &ResponseStream<Value>,
	) -> Result<Value, SearchError> {
		let documents = corpus.documents(&[CASES_INDEX.to_string()]);
		let mut matched: Vec<&Value> = Vec::new();
		scan_chunks(&documents, tuning, stream, |chunk| {
			matched.extend(chunk.iter().copied().filter(|document| self.admits(document)));
			None
		})?;

		matched.sort_by(|left, right| self.compare(left, right));
		let per_page = self.per_page as usize;
		let skip = self.page.saturating_sub(1) as usize * per_page;
		let cases: Vec<&Value> = matched.iter().copied().skip(skip).take(per_page).collect();

		Ok(json!({
			"cases": cases,
			"page": self.page,
			"perPage": self.per_page,
			"total": matched.len(),
		}))
	}
}
