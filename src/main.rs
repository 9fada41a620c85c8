mod cli;
mod settings;
mod workflow;

use anyhow::{Result, bail};
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	let resolved = settings::load(&cli)?;
	lookout::logging::initialize(resolved.verbose);

	if cli.print_config {
		resolved.print_summary();
	}

	let workflow = SearchWorkflow::from_config(&resolved)?;
	let report = workflow.run(&cli.command)?;

	match cli.output {
		OutputFormat::Plain => print_plain(&report),
		OutputFormat::Json => print_json(&report)?,
	}

	if !report.settled {
		bail!(
			"{} did not finish within {} ms",
			report.query,
			resolved.timeout.as_millis()
		);
	}
	Ok(())
}
