use clap::{CommandFactory, Parser};

use super::{CliArgs, OrderArg, OutputFormat, QueryCommand};

#[test]
fn command_definition_is_consistent() {
	CliArgs::command().debug_assert();
}

#[test]
fn first_last_seen_accepts_comma_separated_indices() {
	let parsed = CliArgs::try_parse_from([
		"lookout",
		"first-last-seen",
		"--field",
		"host.name",
		"--value",
		"siem-kibana",
		"--index",
		"auditbeat-*,winlogbeat-*",
	])
	.expect("parses");

	assert_eq!(parsed.output, OutputFormat::Plain);
	assert_eq!(
		parsed.command,
		QueryCommand::FirstLastSeen {
			field: "host.name".into(),
			value: "siem-kibana".into(),
			indices: vec!["auditbeat-*".into(), "winlogbeat-*".into()],
			order: OrderArg::Asc,
			doc_value_fields: Vec::new(),
		}
	);
}

#[test]
fn total_count_range_needs_both_ends() {
	let result = CliArgs::try_parse_from([
		"lookout",
		"total-count",
		"--index",
		"threat-intel",
		"--from",
		"2022-04-01T00:00:00Z",
	]);
	assert!(result.is_err());
}

#[test]
fn recent_cases_parses_timestamps() {
	let parsed = CliArgs::try_parse_from([
		"lookout",
		"--output",
		"json",
		"recent-cases",
		"--from",
		"2020-07-07T08:20:18.966Z",
		"--to",
		"2020-07-08T08:20:18.966Z",
	])
	.expect("parses");

	assert_eq!(parsed.output, OutputFormat::Json);
	let QueryCommand::RecentCases { from, to } = parsed.command else {
		panic!("expected recent-cases");
	};
	assert!(from < to);
}

#[test]
fn a_subcommand_is_required() {
	assert!(CliArgs::try_parse_from(["lookout"]).is_err());
}

#[test]
fn rule_alerts_defaults_to_security_signals_index() {
	let parsed = CliArgs::try_parse_from(["lookout", "rule-alerts"]).expect("parses");
	assert_eq!(
		parsed.command,
		QueryCommand::RuleAlerts {
			signal_index: ".alerts-security.alerts-default".into(),
			size: 4,
		}
	);
}
