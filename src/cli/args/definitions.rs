use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, ColorChoice, Parser, Subcommand};

use super::options::{OrderArg, OutputFormat};
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `lookout` binary.
#[derive(Parser, Debug)]
#[command(
    name = "lookout",
    version,
    long_version = long_version(),
    about = "Run cancellable streaming searches against a local event corpus",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "LOOKOUT_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON corpus mapping index names to documents (default: corpus.json in the data directory)"
    )]
    pub(crate) corpus: Option<PathBuf>,
    #[arg(
        short = 's',
        long,
        value_name = "NAME",
        help = "Search strategy to request (default: securitySolutionSearchStrategy)"
    )]
    pub(crate) strategy: Option<String>,
    #[arg(
        long = "chunk-size",
        value_name = "NUM",
        help = "Documents scanned between abort checks (default: 512)"
    )]
    pub(crate) chunk_size: Option<usize>,
    #[arg(
        long = "chunk-delay-ms",
        value_name = "MS",
        help = "Pause after every scanned chunk (default: 0)"
    )]
    pub(crate) chunk_delay_ms: Option<u64>,
    #[arg(
        short = 't',
        long = "timeout-ms",
        value_name = "MS",
        help = "Give up waiting for a terminal response after this long (default: 30000)"
    )]
    pub(crate) timeout_ms: Option<u64>,
    #[arg(
        short = 'v',
        long,
        help = "Log search lifecycle events to stderr (default: disabled)"
    )]
    pub(crate) verbose: bool,
    #[arg(
        short = 'p',
        long = "print-config",
        help = "Print the resolved configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t = OutputFormat::Plain,
        help = "Choose how to print the result"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: QueryCommand,
}

/// Searches the binary knows how to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryCommand {
    /// Find when an entity first or last showed up in the event indices.
    FirstLastSeen {
        #[arg(long, value_name = "FIELD", help = "Field identifying the entity, e.g. host.name")]
        field: String,
        #[arg(long, value_name = "VALUE", help = "Entity value to look up")]
        value: String,
        #[arg(
            short = 'i',
            long = "index",
            value_delimiter = ',',
            required = true,
            value_name = "PATTERN",
            help = "Index names or prefix patterns ending in '*'"
        )]
        indices: Vec<String>,
        #[arg(
            long,
            value_enum,
            default_value_t = OrderArg::Asc,
            help = "asc finds the first appearance, desc the last"
        )]
        order: OrderArg,
        #[arg(
            long = "doc-value-field",
            value_delimiter = ',',
            value_name = "FIELD",
            help = "Extra doc value fields to request (default: none)"
        )]
        doc_value_fields: Vec<String>,
    },
    /// Count documents, optionally restricted to a time range.
    TotalCount {
        #[arg(
            short = 'i',
            long = "index",
            value_delimiter = ',',
            required = true,
            value_name = "PATTERN",
            help = "Index names or prefix patterns ending in '*'"
        )]
        indices: Vec<String>,
        #[arg(long, value_name = "RFC3339", requires = "to", help = "Inclusive range start")]
        from: Option<DateTime<Utc>>,
        #[arg(long, value_name = "RFC3339", requires = "from", help = "Inclusive range end")]
        to: Option<DateTime<Utc>>,
    },
    /// Rank rules by the severity and number of their open alerts.
    RuleAlerts {
        #[arg(
            long = "signal-index",
            value_name = "INDEX",
            default_value = ".alerts-security.alerts-default",
            help = "Index holding detection alerts"
        )]
        signal_index: String,
        #[arg(long, value_name = "NUM", default_value_t = 4, help = "Number of rules to list")]
        size: usize,
    },
    /// List the most recently created cases in a date range.
    RecentCases {
        #[arg(long, value_name = "RFC3339", help = "Range start, truncated to the day")]
        from: DateTime<Utc>,
        #[arg(long, value_name = "RFC3339", help = "Range end, truncated to the day")]
        to: DateTime<Utc>,
    },
}
