//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tabnorm: clean and bucket tabular churn data
#[derive(Parser)]
#[command(name = "tabnorm")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the normalization pipeline and write the cleaned data
    Clean {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pipeline configuration (default: built-in Telco churn preset)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output path for cleaned data (default: <file>_clean.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the run report (default: <file>.report.json)
        #[arg(long, value_name = "REPORT")]
        report: Option<PathBuf>,

        /// Exit with an error if any value failed coercion
        #[arg(long)]
        strict: bool,

        /// Leave per-row audits out of the report
        #[arg(long)]
        no_audits: bool,
    },

    /// Clean a file and print null counts and label cross-tabulations
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pipeline configuration (default: built-in Telco churn preset)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Outcome column to split labels by
        #[arg(long, default_value = "Churn")]
        by: String,

        /// Column to tabulate (repeatable; default: every bucket label column)
        #[arg(long = "column", value_name = "COL")]
        columns: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in bucket tables
    Bins {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
