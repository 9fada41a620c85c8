use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};

use crate::cli::CliArgs;
use lookout::app_dirs;

const ENV_PREFIX: &str = "lookout";
const LOCAL_CONFIG_NAMES: [&str; 2] = [".lookout.toml", "lookout.toml"];

/// Stack every configuration source, lowest precedence first: default files,
/// `--config` files, then `LOOKOUT__SECTION__KEY` variables.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
    let defaults = if cli.no_config {
        Vec::new()
    } else {
        default_config_files()
    };
    let optional = defaults
        .into_iter()
        .map(|path| File::from(path).required(false));
    let explicit = cli
        .config
        .iter()
        .map(|path| File::from(path.as_path()).required(true));

    optional
        .chain(explicit)
        .fold(Config::builder(), |builder, file| builder.add_source(file))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to assemble configuration")
}

/// `config.toml` in the config directory, then the working directory files.
pub(super) fn default_config_files() -> Vec<PathBuf> {
    let user = app_dirs::get_config_dir()
        .ok()
        .map(|dir| dir.join("config.toml"));
    let local = env::current_dir()
        .ok()
        .into_iter()
        .flat_map(|cwd| LOCAL_CONFIG_NAMES.map(|name| cwd.join(name)));
    user.into_iter().chain(local).collect()
}
