//! hive-inspect - summarize an AVDECC device export
//!
//! Prints device identity, gPTP state and stream configuration found in a
//! Hive export, followed by gPTP integration recommendations.

use anyhow::Result;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hive-inspect")]
#[command(
    author,
    version,
    about = "Summarize gPTP and stream state from an AVDECC device export"
)]
#[command(long_about = "
hive-inspect scans a device export saved by an AVDECC controller for
identity, gPTP clock parameters, AVB capabilities, stream configuration
and clock domains, then prints a summary and gPTP integration checklist.

EXAMPLES:
    hive-inspect Entity_0x000A92FFFE00E935.ave
    hive-inspect --json export.ave          # Findings as JSON
    hive-inspect --local-id 0x001B21FFFE000001 export.ave
")]
struct Cli {
    /// Device export file to analyze
    #[arg(required = true)]
    export: PathBuf,

    /// Output findings as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Skip the recommendation and next-steps blocks
    #[arg(long)]
    no_recommendations: bool,

    /// Entity ID that identifies this device as grandmaster
    #[arg(long, value_name = "HEX", default_value = hive_inspect::DEFAULT_LOCAL_ID)]
    local_id: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ok = if cli.json {
        match hive_inspect::load_findings(&cli.export) {
            Ok(findings) => {
                writeln!(out, "{}", serde_json::to_string_pretty(&findings)?)?;
                true
            }
            Err(err) => {
                writeln!(out, "❌ {}", err)?;
                false
            }
        }
    } else {
        let use_color = !cli.no_color && io::stdout().is_terminal();
        let opts = hive_inspect::ReportOptions::new()
            .with_color(use_color)
            .with_local_id(&cli.local_id)
            .with_recommendations(!cli.no_recommendations);
        hive_inspect::analyze_export(&cli.export, &opts, &mut out)?
    };

    out.flush()?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
