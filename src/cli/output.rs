use anyhow::Result;
use serde_json::Value;

use crate::workflow::Report;

/// Print a plain-text representation of the report.
pub(crate) fn print_plain(report: &Report) {
	for line in plain_lines(report) {
		println!("{line}");
	}
}

fn plain_lines(report: &Report) -> Vec<String> {
	let mut lines = vec![format!("query: {}", report.query)];
	if !report.settled {
		lines.push("status: timed out".to_string());
	}
	if let Some(message) = report.state["errorMessage"].as_str() {
		lines.push(format!("error: {message}"));
	}
	if let Value::Object(data) = &report.state["data"] {
		for (key, value) in data {
			match value {
				Value::Array(items) => {
					lines.push(format!("{key}: {} item(s)", items.len()));
					lines.extend(items.iter().map(|item| format!("  {item}")));
				}
				Value::Null => lines.push(format!("{key}: -")),
				Value::String(text) => lines.push(format!("{key}: {text}")),
				other => lines.push(format!("{key}: {other}")),
			}
		}
	}
	lines
}

/// Format the report as a JSON string.
pub(crate) fn format_report_json(report: &Report) -> Result<String> {
	Ok(serde_json::to_string_pretty(report)?)
}

/// Print the JSON representation of the report.
pub(crate) fn print_json(report: &Report) -> Result<()> {
	println!("{}", format_report_json(report)?);
	Ok(())
}
