//! Concrete searches: request shapes, local execution and how each response
//! lands in result state.

mod first_last_seen;
mod recent_cases;
mod rule_alerts;
mod total_count;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use first_last_seen::{FirstLastSeen, FirstLastSeenQuery, FirstLastSeenRequest};
pub use recent_cases::{
	CASES_INDEX, DEFAULT_OWNER, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, RecentCaseItem, RecentCases,
	RecentCasesQuery, RecentCasesRequest,
};
pub use rule_alerts::{
	RULE_ALERTS_PAGE_SIZE, RuleAlertItem, RuleAlerts, RuleAlertsQuery, RuleAlertsRequest, Severity,
};
pub use total_count::{TotalCount, TotalCountQuery, TotalCountRequest};

/// Primary event timestamp field.
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// RFC 3339 timestamp held by `value`, normalised to UTC.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
	let raw = value.as_str()?;
	DateTime::parse_from_rfc3339(raw)
		.ok()
		.map(|timestamp| timestamp.with_timezone(&Utc))
}
