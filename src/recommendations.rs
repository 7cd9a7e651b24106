//! Static guidance printed after a successful analysis.

use std::io::{self, Write};

const RECOMMENDATIONS: &[(&str, &[&str])] = &[
    (
        "Test PC as Grandmaster",
        &[
            "Use grandmaster_config.ini to make PC the master clock",
            "Monitor if PreSonus accepts PC as grandmaster",
        ],
    ),
    (
        "Profile Compatibility",
        &[
            "Try Milan profile (test_milan_config.ini)",
            "Try Standard IEEE 1588 profile (standard_presonus_config.ini)",
            "Compare announce/sync message behavior",
        ],
    ),
    (
        "Timing Analysis",
        &[
            "Monitor propagation delay measurements",
            "Check if PC gPTP can achieve similar timing performance",
            "Verify PDelay request/response cycle timing",
        ],
    ),
    (
        "Stream Integration",
        &[
            "Test AVDECC enumeration between PC and PreSonus",
            "Attempt stream connections if AVDECC controller available",
            "Monitor for SRP (Stream Reservation Protocol) messages",
        ],
    ),
    (
        "Wireshark Capture",
        &[
            "Capture PTP traffic during PC gPTP operation",
            "Compare timing intervals with PreSonus requirements",
            "Analyze BMCA (Best Master Clock Algorithm) negotiation",
        ],
    ),
];

const NEXT_STEPS: &[&str] = &[
    "Run gPTP with different profiles and monitor PreSonus response",
    "Use Wireshark to capture PTP traffic for detailed analysis",
    "Test bidirectional gPTP synchronization",
    "Document timing performance differences",
];

/// Write the gPTP integration checklist. Input-independent.
pub fn write_recommendations<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "💡 RECOMMENDATIONS FOR gPTP INTEGRATION:")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for (i, (title, items)) in RECOMMENDATIONS.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}. {}:", i + 1, title)?;
        for item in *items {
            writeln!(out, "   - {}", item)?;
        }
    }
    Ok(())
}

pub fn write_next_steps<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "📋 NEXT STEPS:")?;
    writeln!(out, "{}", "-".repeat(20))?;
    for (i, step) in NEXT_STEPS.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, step)?;
    }
    Ok(())
}
