use std::path::PathBuf;
use std::time::Duration;

use lookout::search::{DEFAULT_STRATEGY, ScanTuning};

/// Settings the search workflow runs with.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Strategy override; each query's own default applies when unset.
    pub strategy: Option<String>,
    pub tuning: ScanTuning,
    pub timeout: Duration,
    pub corpus: Option<PathBuf>,
    pub verbose: bool,
}

impl ResolvedConfig {
    /// Print a human readable summary of the effective configuration.
    pub fn print_summary(&self) {
        println!("Effective configuration:");
        println!(
            "  Strategy: {}",
            self.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY)
        );
        println!("  Chunk size: {}", self.tuning.chunk_size);
        println!("  Chunk delay: {} ms", self.tuning.chunk_delay.as_millis());
        println!("  Timeout: {} ms", self.timeout.as_millis());
        match &self.corpus {
            Some(path) => println!("  Corpus: {}", path.display()),
            None => println!("  Corpus: (empty)"),
        }
        println!("  Verbose logging: {}", bool_to_word(self.verbose));
    }
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
