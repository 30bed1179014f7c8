use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lch_cli::commands::{check, summary, upcoming};
use lch_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Summary { report, date, json } => {
            summary::run(&mut stdout, report, *date, *json)?;
        }
        Commands::Upcoming {
            report,
            date,
            at,
            within,
            json,
        } => {
            upcoming::run(&mut stdout, report, *date, at.as_deref(), *within, *json)?;
        }
        Commands::Check {
            report,
            date,
            at,
            region,
            ra,
            dec,
        } => {
            let allowed = check::run(
                &mut stdout,
                report,
                *date,
                at,
                region.as_deref(),
                *ra,
                *dec,
            )?;
            if !allowed {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
