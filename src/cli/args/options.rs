use clap::ValueEnum;
use lookout::Direction;

/// Sort order accepted by the first/last seen lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OrderArg {
    /// Earliest matching event.
    Asc,
    /// Latest matching event.
    Desc,
}

impl From<OrderArg> for Direction {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => Direction::Asc,
            OrderArg::Desc => Direction::Desc,
        }
    }
}

/// Output formats supported by the CLI utility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Plain,
    Json,
}
