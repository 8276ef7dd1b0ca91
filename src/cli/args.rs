use crate::analyzers::{DiffBasis, PivotRows};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airq-dashboard")]
#[command(about = "Aggregates air-quality sensor spreadsheets into dashboard views")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        help = "Spreadsheet path or http(s) URL [default: `source` from the config]"
    )]
    pub source: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: airq-dashboard.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row count, date span and the header mapping applied at load
    Info,

    /// Print the loaded rows under the canonical header
    Raw {
        #[arg(short, long, default_value = "20", help = "Rows to print (0 = all)")]
        limit: usize,
    },

    /// Mean of every measurement column
    Kpis,

    /// Pollutant means ranked from highest to lowest
    Pollutants,

    /// Daily means of humidity, pressure and temperature
    Daily,

    /// Mean temperature heatmap by weekday
    Pivot {
        #[arg(long, default_value = "hour", help = "Row key: hour or day-of-month")]
        rows: PivotRows,
    },

    /// First-order differences of humidity, pressure and temperature
    Diff {
        #[arg(long, help = "First date, inclusive (YYYY-MM-DD)")]
        start: NaiveDate,

        #[arg(long, help = "Last date, inclusive (YYYY-MM-DD)")]
        end: NaiveDate,

        #[arg(long, help = "daily or readings [default: from config, else daily]")]
        basis: Option<DiffBasis>,
    },

    /// All parameter-free views at once
    Summary,
}
