use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use lookout::app_dirs;
use lookout::search::{SCAN_CHUNK_SIZE, ScanTuning};
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::ResolvedConfig;

/// Name of the corpus file looked up in the data directory.
const DEFAULT_CORPUS_FILE: &str = "corpus.json";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    search: SearchSection,
    corpus: CorpusSection,
    logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
    strategy: Option<String>,
    chunk_size: Option<usize>,
    chunk_delay_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CorpusSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
    verbose: Option<bool>,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(strategy) = cli.strategy.clone() {
            self.search.strategy = Some(strategy);
        }
        if let Some(value) = cli.chunk_size {
            self.search.chunk_size = Some(value);
        }
        if let Some(value) = cli.chunk_delay_ms {
            self.search.chunk_delay_ms = Some(value);
        }
        if let Some(value) = cli.timeout_ms {
            self.search.timeout_ms = Some(value);
        }
        if let Some(path) = cli.corpus.clone() {
            self.corpus.path = Some(path);
        }
        if cli.verbose {
            self.logging.verbose = Some(true);
        }
    }

    pub(super) fn resolve(self) -> Result<ResolvedConfig> {
        let chunk_size = self.search.chunk_size.unwrap_or(SCAN_CHUNK_SIZE);
        ensure!(chunk_size > 0, "search.chunk_size must be greater than zero");

        let timeout_ms = self.search.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        ensure!(timeout_ms > 0, "search.timeout_ms must be greater than zero");

        let strategy = self
            .search
            .strategy
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let corpus = match self.corpus.path {
            Some(path) => Some(resolve_explicit_corpus(path)?),
            None => default_corpus(),
        };

        Ok(ResolvedConfig {
            strategy,
            tuning: ScanTuning {
                chunk_size,
                chunk_delay: Duration::from_millis(self.search.chunk_delay_ms.unwrap_or(0)),
            },
            timeout: Duration::from_millis(timeout_ms),
            corpus,
            verbose: self.logging.verbose.unwrap_or(false),
        })
    }
}

fn resolve_explicit_corpus(path: PathBuf) -> Result<PathBuf> {
    let path = if path.is_relative() {
        env::current_dir()
            .context("failed to resolve current directory for corpus")?
            .join(path)
    } else {
        path
    };
    ensure!(path.is_file(), "corpus file {} does not exist", path.display());
    Ok(path)
}

/// `corpus.json` in the data directory, when present.
fn default_corpus() -> Option<PathBuf> {
    let path = app_dirs::get_data_dir().ok()?.join(DEFAULT_CORPUS_FILE);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_without_any_sources() {
        let resolved = RawConfig::default().resolve().unwrap();
        assert_eq!(resolved.strategy, None);
        assert_eq!(resolved.tuning, ScanTuning::default());
        assert_eq!(resolved.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert!(!resolved.verbose);
    }

    #[test]
    fn blank_strategy_falls_back_to_query_default() {
        let mut raw = RawConfig::default();
        raw.search.strategy = Some("  ".into());
        assert_eq!(raw.resolve().unwrap().strategy, None);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = RawConfig::default();
        raw.search.timeout_ms = Some(0);
        assert!(raw.resolve().is_err());
    }
}
