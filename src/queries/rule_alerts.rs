//! Open detection alerts grouped by the rule that raised them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lookout_stream::ResponseStream;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{TIMESTAMP_FIELD, parse_timestamp};
use crate::error::SearchError;
use crate::reducer::SearchQuery;
use crate::search::{Corpus, LocalQuery, ScanTuning, field_matches, field_value, scan_chunks};

/// Rules listed per request.
pub const RULE_ALERTS_PAGE_SIZE: usize = 4;

const RULE_NAME_FIELD: &str = "kibana.alert.rule.name";
const RULE_UUID_FIELD: &str = "kibana.alert.rule.uuid";
const SEVERITY_FIELD: &str = "kibana.alert.severity";
const WORKFLOW_STATUS_FIELD: &str = "kibana.alert.workflow_status";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Low,
	Medium,
	High,
	Critical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAlertsRequest {
	pub signal_index_name: String,
	pub size: usize,
}

impl RuleAlertsRequest {
	pub fn new(signal_index_name: impl Into<String>) -> Self {
		Self {
			signal_index_name: signal_index_name.into(),
			size: RULE_ALERTS_PAGE_SIZE,
		}
	}
}

/// Row of the rule alerts table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAlertItem {
	pub id: String,
	pub name: String,
	pub last_alert_at: String,
	pub alert_count: u64,
	pub severity: Severity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RuleAlerts {
	pub items: Vec<RuleAlertItem>,
}

#[derive(Debug, Deserialize)]
struct RuleAlertsPage {
	rules: Vec<RuleAlertItem>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleAlertsQuery;

impl SearchQuery for RuleAlertsQuery {
	type Request = RuleAlertsRequest;
	type Response = Value;
	type Data = RuleAlerts;

	const ID: &'static str = "detection-response-rule-alerts-severity-table";
	const ERROR_TITLE: &'static str = "Failed to load rule alerts";

	fn apply_complete(&self, data: &mut RuleAlerts, response: Value) -> Result<(), SearchError> {
		let page: RuleAlertsPage = serde_json::from_value(response)
			.map_err(|err| SearchError::malformed(err.to_string()))?;
		data.items = page.rules;
		Ok(())
	}
}

/// Running aggregate for one rule.
struct RuleBucket {
	id: String,
	count: u64,
	last_alert: DateTime<Utc>,
	last_alert_raw: String,
	severity: Severity,
}

impl RuleBucket {
	fn to_json(&self, name: &str) -> Value {
		json!({
			"id": self.id,
			"name": name,
			"last_alert_at": self.last_alert_raw,
			"alert_count": self.count,
			"severity": self.severity,
		})
	}
}

fn severity_of(document: &Value) -> Option<Severity> {
	serde_json::from_value(field_value(document, SEVERITY_FIELD)?.clone()).ok()
}

impl LocalQuery for RuleAlertsRequest {
	type Response = Value;

	fn execute(
		&self,
		corpus: &Corpus,
		tuning: &ScanTuning,
		stream: &ResponseStream<Value>,
	) -> Result<Value, SearchError> {
		let documents = corpus.documents(std::slice::from_ref(&self.signal_index_name));
		let mut buckets: BTreeMap<String, RuleBucket> = BTreeMap::new();

		scan_chunks(&documents, tuning, stream, |chunk| {
			for alert in chunk {
				if !field_matches(alert, WORKFLOW_STATUS_FIELD, "open") {
					continue;
				}
				let Some(name) = field_value(alert, RULE_NAME_FIELD).and_then(Value::as_str) else {
					continue;
				};
				let Some(stamp) = field_value(alert, TIMESTAMP_FIELD) else {
					continue;
				};
				let (Some(raw), Some(timestamp)) = (stamp.as_str(), parse_timestamp(stamp)) else {
					continue;
				};
				let id = field_value(alert, RULE_UUID_FIELD)
					.and_then(Value::as_str)
					.unwrap_or(name)
					.to_string();
				let severity = severity_of(alert).unwrap_or(Severity::Low);

				let bucket = buckets.entry(name.to_string()).or_insert_with(|| RuleBucket {
					id: id.clone(),
					count: 0,
					last_alert: timestamp,
					last_alert_raw: raw.to_string(),
					severity,
				});
				bucket.count += 1;
				if timestamp > bucket.last_alert {
					bucket.last_alert = timestamp;
					bucket.last_alert_raw = raw.to_string();
					bucket.severity = severity;
					bucket.id = id;
				}
			}
			None
		})?;

		let mut ranked: Vec<(&String, &RuleBucket)> = buckets.iter().collect();
		ranked.sort_by(|(_, left), (_, right)| {
			right
				.severity
				.cmp(&left.severity)
				.then(right.count.cmp(&left.count))
		});
		let rules: Vec<Value> = ranked
			.into_iter()
			.take(self.size)
			.map(|(name, bucket)| bucket.to_json(name))
			.collect();

		Ok(json!({ "rules": rules }))
	}
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;

	use lookout_stream::AbortController;

	use super::*;

	const SIGNALS: &str = ".alerts-security.alerts-default";

	fn alert(rule: &str, at: &str, severity: &str, status: &str) -> Value {
		json!({
			"@timestamp": at,
			"kibana.alert.rule.name": rule,
			"kibana.alert.rule.uuid": format!("{rule}-id"),
			"kibana.alert.severity": severity,
			"kibana.alert.workflow_status": status,
		})
	}

	fn run(alerts: Vec<Value>, size: usize) -> Value {
		let mut corpus = Corpus::new();
		corpus.insert(SIGNALS, alerts);
		let (tx, _rx) = mpsc::channel();
		let stream = ResponseStream::new(tx, 1, AbortController::new().signal());
		let mut request = RuleAlertsRequest::new(SIGNALS);
		request.size = size;
		request
			.execute(&corpus, &ScanTuning::default(), &stream)
			.unwrap()
	}

	#[test]
	fn groups_open_alerts_by_rule() {
		let response = run(
			vec![
				alert("brute force", "2022-06-01T10:00:00Z", "high", "open"),
				alert("brute force", "2022-06-01T12:00:00+01:00", "critical", "open"),
				alert("brute force", "2022-06-02T00:00:00Z", "critical", "closed"),
				alert("dns tunnel", "2022-06-01T09:00:00Z", "medium", "open"),
			],
			RULE_ALERTS_PAGE_SIZE,
		);

		assert_eq!(
			response,
			json!({"rules": [
				{
					"id": "brute force-id",
					"name": "brute force",
					"last_alert_at": "2022-06-01T12:00:00+01:00",
					"alert_count": 2,
					"severity": "critical",
				},
				{
					"id": "dns tunnel-id",
					"name": "dns tunnel",
					"last_alert_at": "2022-06-01T09:00:00Z",
					"alert_count": 1,
					"severity": "medium",
				},
			]})
		);
	}

	#[test]
	fn keeps_only_the_top_rules() {
		let alerts = ["a", "b", "c", "d", "e"]
			.iter()
			.map(|rule| alert(rule, "2022-06-01T10:00:00Z", "low", "open"))
			.collect();
		let response = run(alerts, 3);
		assert_eq!(response["rules"].as_array().unwrap().len(), 3);
	}

	#[test]
	fn complete_parses_rows() {
		let mut data = RuleAlerts::default();
		let response = run(
			vec![alert("brute force", "2022-06-01T10:00:00Z", "high", "open")],
			RULE_ALERTS_PAGE_SIZE,
		);
		RuleAlertsQuery.apply_complete(&mut data, response).unwrap();

		assert_eq!(data.items.len(), 1);
		assert_eq!(data.items[0].severity, Severity::High);
		assert_eq!(data.items[0].alert_count, 1);
	}

	#[test]
	fn unknown_severity_is_malformed() {
		let mut data = RuleAlerts::default();
		let err = RuleAlertsQuery
			.apply_complete(
				&mut data,
				json!({"rules": [{
					"id": "x",
					"name": "x",
					"last_alert_at": "2022-06-01T10:00:00Z",
					"alert_count": 1,
					"severity": "catastrophic",
				}]}),
			)
			.unwrap_err();
		assert!(matches!(err, SearchError::Malformed { .. }));
		assert!(data.items.is_empty());
	}
}
