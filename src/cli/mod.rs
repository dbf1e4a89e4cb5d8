use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::compare::SortOrder;

pub mod formatters;

#[derive(Parser)]
#[command(name = "snapdiff")]
#[command(
    version,
    about = "Compare two portfolio snapshots: wealth change vs. market performance"
)]
#[command(
    long_about = "Compare two brokerage portfolio exports (e.g. DeGiro Portfolio.csv) and separate money added or withdrawn from market gains and losses."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (column names, locale)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare an older snapshot with a newer one
    Compare {
        /// Older snapshot (CSV export)
        older: PathBuf,

        /// Newer snapshot (CSV export)
        newer: PathBuf,

        /// Sort rows by market performance
        #[arg(short, long, value_enum, default_value_t = SortArg::Unsorted)]
        sort: SortArg,

        /// Also write the comparison to this file (semicolon separated)
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Inspect a snapshot's header and column mapping
    Inspect {
        /// Path to the CSV file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Keep join order
    #[value(name = "none")]
    Unsorted,
    /// Best market performance first
    Desc,
    /// Worst market performance first
    Asc,
}

impl SortArg {
    pub fn order(self) -> Option<SortOrder> {
        match self {
            SortArg::Unsorted => None,
            SortArg::Desc => Some(SortOrder::Descending),
            SortArg::Asc => Some(SortOrder::Ascending),
        }
    }
}
