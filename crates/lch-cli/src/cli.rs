//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Laser clearance closure-report queries.
///
/// Parses closure reports published by the laser clearance authority and
/// answers "can the laser fire" questions from the command line.
#[derive(Debug, Parser)]
#[command(name = "lch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize a closure report: regions, closures, total closed time.
    Summary {
        /// Path to the closure report file.
        report: PathBuf,

        /// Calendar date (UTC) the report's wall-clock times refer to.
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List upcoming closures across all regions, merged and time-ordered.
    Upcoming {
        /// Path to the closure report file.
        report: PathBuf,

        /// Calendar date (UTC) the report's wall-clock times refer to.
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Reference time, RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
        /// Defaults to now.
        #[arg(long)]
        at: Option<String>,

        /// Lookahead horizon in minutes.
        #[arg(long, default_value_t = 60)]
        within: i64,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Check whether propagation is allowed at a time and place.
    ///
    /// Exits non-zero when the answer is closed, for scripting.
    Check {
        /// Path to the closure report file.
        report: PathBuf,

        /// Calendar date (UTC) the report's wall-clock times refer to.
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Query time, RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
        #[arg(long)]
        at: String,

        /// Region name to check.
        #[arg(long, conflicts_with_all = ["ra", "dec"])]
        region: Option<String>,

        /// Right ascension of the location, in degrees.
        #[arg(long, requires = "dec")]
        ra: Option<f64>,

        /// Declination of the location, in degrees.
        #[arg(long, requires = "ra")]
        dec: Option<f64>,
    },
}
