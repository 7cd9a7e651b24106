//! # hive-inspect - AVDECC export summaries
//!
//! Reads a device export saved by an AVDECC controller (Hive) and reports
//! what it can find about the device: identity, gPTP clock state, AVB
//! capabilities, stream configuration and connections, clock domains and audio
//! channels.
//!
//! Exports are treated as unstructured text. Each finding comes from one
//! pattern or keyword rule (see [`rules::STANDARD_RULES`]); a rule that does
//! not match simply leaves its finding out.
//!
//! ## Usage
//!
//! ```no_run
//! use hive_inspect::{analyze_export, ReportOptions};
//! use std::path::Path;
//!
//! let path = Path::new("Entity_0x000A92FFFE00E935.ave");
//! let mut out = std::io::stdout();
//! if !analyze_export(path, &ReportOptions::new(), &mut out).unwrap() {
//!     std::process::exit(1);
//! }
//! ```

mod extractor;
mod loader;
mod recommendations;
mod report;
pub mod rules;
mod types;

pub use extractor::{extract, Extractor, RuleError};
pub use loader::{decode_latin1, load_export, LoadError};
pub use recommendations::{write_next_steps, write_recommendations};
pub use report::{
    device_role, is_milan_compatible, render_report, DeviceRole, ReportOptions, DEFAULT_LOCAL_ID,
};
pub use types::{FindingValue, Findings};

use std::io::{self, Write};
use std::path::Path;

const BANNER_WIDTH: usize = 80;

/// Extract findings from already-decoded export text.
pub fn analyze_text(text: &str) -> Findings {
    extract(text)
}

/// Load an export and extract its findings.
pub fn load_findings(path: &Path) -> Result<Findings, LoadError> {
    let text = load_export(path)?;
    let findings = extract(&text);
    tracing::info!("analyzed {}: {} findings", path.display(), findings.len());
    Ok(findings)
}

/// Run the full analysis for `path`, writing the report to `out`.
///
/// Returns `Ok(false)` when the export could not be read; the reason has
/// already been written to `out` and no report follows. `Err` only reports
/// failures writing to `out`.
pub fn analyze_export<W: Write>(path: &Path, opts: &ReportOptions, out: &mut W) -> io::Result<bool> {
    report::write_separator(out, BANNER_WIDTH)?;
    writeln!(out, "HIVE AVDECC EXPORT ANALYSIS")?;
    report::write_separator(out, BANNER_WIDTH)?;

    let success = match load_findings(path) {
        Ok(findings) => {
            render_report(&findings, opts, out)?;
            if opts.recommendations {
                write_recommendations(out)?;
                write_next_steps(out)?;
            }
            true
        }
        Err(err) => {
            tracing::warn!("{}", err);
            writeln!(out, "❌ {}", err)?;
            false
        }
    };

    writeln!(out)?;
    report::write_separator(out, BANNER_WIDTH)?;
    Ok(success)
}
