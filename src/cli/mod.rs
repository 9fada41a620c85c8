mod args;
mod output;

pub(crate) use args::{CliArgs, OrderArg, OutputFormat, QueryCommand, parse_cli};
pub(crate) use output::{print_json, print_plain};
