//! Human-readable rendering of [`Findings`].
//!
//! Sections always appear in the same order. Inside a section a line is only
//! written when its finding exists, except the four stream totals, which are
//! printed at zero. The summary section adds the derived judgments (device
//! role, streaming activity, Milan compatibility).

use crate::rules::STUDIOLIVE_32SC;
use crate::types::Findings;
use std::io::{self, Write};

/// Entity ID of the analyzed device when it is the gPTP grandmaster.
pub const DEFAULT_LOCAL_ID: &str = "000A92FFFE00E935";

/// Clock classes accepted as Milan-compatible (compared as strings).
const MILAN_CLOCK_CLASSES: &[&str] = &["6", "7"];

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit ANSI colors in section headers
    pub color: bool,
    /// Grandmaster ID that means "this device is the grandmaster"
    pub local_id: String,
    /// Print the recommendation and next-steps blocks after the report
    pub recommendations: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            color: false,
            local_id: DEFAULT_LOCAL_ID.to_string(),
            recommendations: true,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, enable: bool) -> Self {
        self.color = enable;
        self
    }

    /// Override the local grandmaster ID (hex digits, no `0x`).
    pub fn with_local_id(mut self, id: &str) -> Self {
        self.local_id = id.strip_prefix("0x").unwrap_or(id).to_string();
        self
    }

    pub fn with_recommendations(mut self, enable: bool) -> Self {
        self.recommendations = enable;
        self
    }
}

/// Where the device sits in its gPTP domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole<'a> {
    /// The grandmaster is the device itself
    Grandmaster,
    /// Synchronized to another grandmaster (hex digits, no `0x`)
    SyncedTo(&'a str),
}

/// Infer the device role from the grandmaster ID finding.
pub fn device_role<'a>(findings: &'a Findings, local_id: &str) -> Option<DeviceRole<'a>> {
    let gm = findings.text("grandmaster_id")?;
    if gm == local_id {
        Some(DeviceRole::Grandmaster)
    } else {
        Some(DeviceRole::SyncedTo(gm))
    }
}

/// MBLA format advertised and clock class captured as exactly "6" or "7".
pub fn is_milan_compatible(findings: &Findings) -> bool {
    findings.contains("MBLA")
        && findings
            .text("clock_class")
            .is_some_and(|class| MILAN_CLOCK_CLASSES.contains(&class))
}

pub(crate) fn write_separator<W: Write>(out: &mut W, width: usize) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(width))
}

fn write_section<W: Write>(out: &mut W, title: &str, opts: &ReportOptions) -> io::Result<()> {
    writeln!(out)?;
    if opts.color {
        writeln!(out, "{}{}{}", BOLD, title, RESET)?;
        writeln!(out, "{}{}{}", DIM, "-".repeat(40), RESET)
    } else {
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", "-".repeat(40))
    }
}

fn write_flag<W: Write>(out: &mut W, findings: &Findings, key: &str, line: &str) -> io::Result<()> {
    if findings.contains(key) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn write_count<W: Write>(out: &mut W, findings: &Findings, key: &str, label: &str) -> io::Result<()> {
    if findings.contains(key) {
        writeln!(out, "{}: {}", label, findings.count(key))?;
    }
    Ok(())
}

/// Count line printed even at zero; an absent count reads as 0.
fn write_total<W: Write>(out: &mut W, findings: &Findings, key: &str, label: &str) -> io::Result<()> {
    writeln!(out, "{}: {}", label, findings.count(key))
}

/// Write all report sections for `findings`.
pub fn render_report<W: Write>(
    findings: &Findings,
    opts: &ReportOptions,
    out: &mut W,
) -> io::Result<()> {
    write_section(out, "📍 DEVICE IDENTIFICATION:", opts)?;
    if let Some(id) = findings.text("entity_id") {
        writeln!(out, "Entity ID: 0x{}", id)?;
    }
    if let Some(mac) = findings.text("mac_address") {
        writeln!(out, "MAC Address: {}", mac)?;
    }
    write_flag(out, findings, STUDIOLIVE_32SC, "Device: PreSonus StudioLive 32SC")?;
    if let Some(fw) = findings.text("firmware_version") {
        writeln!(out, "Firmware: {}", fw)?;
    }

    write_section(out, "🕰️ gPTP/AVB INTERFACE:", opts)?;
    if let Some(gm) = findings.text("grandmaster_id") {
        writeln!(out, "Current Grandmaster: 0x{}", gm)?;
    }
    let timing = [
        ("clock_class", "Clock Class", ""),
        ("clock_accuracy", "Clock Accuracy", ""),
        ("log_announce_interval", "Log Announce Interval", ""),
        ("log_sync_interval", "Log Sync Interval", ""),
        ("log_pdelay_interval", "Log PDelay Interval", ""),
        ("propagation_delay", "Propagation Delay", " ns"),
    ];
    for (key, label, unit) in timing {
        if let Some(value) = findings.text(key) {
            writeln!(out, "{}: {}{}", label, value, unit)?;
        }
    }

    write_section(out, "🌐 AVB CAPABILITIES:", opts)?;
    write_flag(out, findings, "AS_CAPABLE", "✅ AS_CAPABLE (Audio/Video capable)")?;
    write_flag(out, findings, "GPTP_ENABLED", "✅ GPTP_ENABLED")?;
    write_flag(out, findings, "SRP_ENABLED", "✅ SRP_ENABLED (Stream Reservation Protocol)")?;
    write_flag(out, findings, "GPTP_GRANDMASTER_SUPPORTED", "✅ GPTP_GRANDMASTER_SUPPORTED")?;
    write_flag(out, findings, "GPTP_SUPPORTED", "✅ GPTP_SUPPORTED")?;

    write_section(out, "🎵 STREAM CONFIGURATION:", opts)?;
    write_total(out, findings, "stream_input_descriptors", "Stream Inputs")?;
    write_total(out, findings, "stream_output_descriptors", "Stream Outputs")?;
    write_total(out, findings, "CONNECTED", "Connected Streams")?;
    write_total(out, findings, "NOT_CONNECTED", "Not Connected Streams")?;
    if let Some(formats) = findings.set("stream_formats") {
        let list: Vec<String> = formats.iter().map(|f| format!("0x{}", f)).collect();
        writeln!(out, "Stream Formats: {}", list.join(", "))?;
    }

    write_section(out, "🔗 STREAM CONNECTIONS:", opts)?;
    match findings.set("talker_ids") {
        Some(talkers) => {
            writeln!(out, "Connected Talkers:")?;
            for talker in talkers {
                writeln!(out, "  - 0x{}", talker)?;
            }
        }
        None => writeln!(out, "No active talker connections found")?,
    }

    write_section(out, "⏰ CLOCK DOMAINS:", opts)?;
    write_count(out, findings, "clock_source_descriptors", "Clock Sources")?;
    write_flag(out, findings, "INPUT_STREAM", "✅ Input Stream Clock Source")?;
    write_flag(out, findings, "INTERNAL", "✅ Internal Clock Source")?;
    write_flag(out, findings, "LOCKED", "🔒 Clock Status: LOCKED found")?;
    write_flag(out, findings, "UNLOCKED", "🔓 Clock Status: UNLOCKED found")?;

    write_section(out, "🎛️ AUDIO CHANNELS:", opts)?;
    if let Some((distinct, min, max)) = findings.numbers("channels") {
        writeln!(out, "Total Channels Found: {}", distinct)?;
        writeln!(out, "Channel Range: {} - {}", min, max)?;
    }
    write_flag(out, findings, "MBLA", "✅ MBLA (Milan-Based Logic Audio) format supported")?;

    write_section(out, "🔍 NETWORK ANALYSIS SUMMARY:", opts)?;
    match device_role(findings, &opts.local_id) {
        Some(DeviceRole::Grandmaster) => {
            writeln!(out, "🏆 This device appears to be acting as gPTP Grandmaster")?
        }
        Some(DeviceRole::SyncedTo(gm)) => {
            writeln!(out, "📡 This device is synchronized to Grandmaster: 0x{}", gm)?
        }
        None => {}
    }

    let connected = findings.count("CONNECTED");
    if connected > 0 {
        writeln!(out, "🎵 Active streaming: {} connected streams", connected)?;
    } else {
        writeln!(out, "⏸️ No active streaming connections")?;
    }

    if is_milan_compatible(findings) {
        writeln!(out, "✅ Appears to be Milan-compatible")?;
    }

    Ok(())
}
