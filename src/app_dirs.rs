//! Where `lookout` looks for its config file and its default corpus.
//!
//! `LOOKOUT_CONFIG_DIR` and `LOOKOUT_DATA_DIR` win over the platform
//! locations; an empty value counts as unset.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const CONFIG_DIR_ENV: &str = "LOOKOUT_CONFIG_DIR";
const DATA_DIR_ENV: &str = "LOOKOUT_DATA_DIR";

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
    resolve(CONFIG_DIR_ENV, ProjectDirs::config_local_dir)
}

/// Directory searched for `corpus.json`.
pub fn get_data_dir() -> Result<PathBuf> {
    resolve(DATA_DIR_ENV, ProjectDirs::data_local_dir)
}

fn resolve(env_var: &str, platform: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
    if let Some(dir) = env::var_os(env_var).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = ProjectDirs::from("io", "lookout", "lookout")
        .ok_or_else(|| anyhow!("no home directory to place lookout files under"))?;
    Ok(platform(&dirs).to_path_buf())
}
