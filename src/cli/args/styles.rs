use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use lookout::app_dirs;

/// `--version` output extended with the directories lookout reads from.
pub(super) fn long_version() -> &'static str {
	let describe = |dir: anyhow::Result<PathBuf>| {
		dir.map_or_else(
			|err| format!("unavailable ({err})"),
			|path| path.display().to_string(),
		)
	};
	let banner = format!(
		"{}\nconfig directory: {}\ncorpus directory: {}\n",
		env!("CARGO_PKG_VERSION"),
		describe(app_dirs::get_config_dir()),
		describe(app_dirs::get_data_dir()),
	);
	Box::leak(banner.into_boxed_str())
}

pub(super) fn cli_styles() -> Styles {
	let heading = AnsiColor::Yellow.on_default().effects(Effects::BOLD);
	Styles::styled()
		.header(heading)
		.usage(heading)
		.literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.placeholder(AnsiColor::Cyan.on_default())
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
}
