//! Declarative extraction rules for AVDECC exports.
//!
//! Every finding the reporter knows about is produced by exactly one entry in
//! [`STANDARD_RULES`]. Labeled fields are matched as `label`, then a lazy run of
//! separator characters that cannot start the value, then the value itself.

use regex::Regex;

/// Talker entity ID meaning "not connected to any talker".
pub const UNCONNECTED_TALKER: &str = "FFFFFFFFFFFFFFFF";

/// Shape of a labeled field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `0x`-prefixed hex digits; the prefix is not captured
    Hex,
    /// Colon-separated MAC address
    Mac,
    /// Dotted version number
    Version,
    /// Unsigned decimal
    Unsigned,
    /// Decimal with optional leading minus
    Signed,
}

impl Shape {
    /// Separator run skipped between the label and the value.
    pub fn separator(self) -> &'static str {
        match self {
            Shape::Hex => r"[^0-9A-Fa-fx]*?0x",
            Shape::Mac => r"[^0-9A-Fa-f:]*?",
            Shape::Version => r"[^0-9.]*?",
            Shape::Unsigned => r"[^0-9]*?",
            Shape::Signed => r"[^-0-9]*?",
        }
    }

    /// Capture group for the value.
    pub fn value(self) -> &'static str {
        match self {
            Shape::Hex => r"([0-9A-Fa-f]+)",
            Shape::Mac => r"([0-9A-Fa-f:]{17})",
            Shape::Version => r"([0-9.]+)",
            Shape::Unsigned => r"([0-9]+)",
            Shape::Signed => r"(-?[0-9]+)",
        }
    }
}

/// How a rule turns the export text into a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Keep only the first `label ... value` match.
    FirstMatch { label: &'static str, shape: Shape },
    /// Keep every match, deduplicated, minus an optional sentinel value.
    AllMatches {
        label: &'static str,
        shape: Shape,
        exclude: Option<&'static str>,
    },
    /// Case-sensitive substring anywhere in the text.
    Presence(&'static str),
    /// Non-overlapping occurrences of a literal substring.
    Count(&'static str),
    /// Decimal numbers directly following `prefix`, summarized as distinct
    /// count and range.
    NumberList { prefix: &'static str },
}

/// A named extraction rule. `label` and `prefix` are regex fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub kind: RuleKind,
}

impl Rule {
    pub const fn first(name: &'static str, label: &'static str, shape: Shape) -> Self {
        Self {
            name,
            kind: RuleKind::FirstMatch { label, shape },
        }
    }

    pub const fn all(
        name: &'static str,
        label: &'static str,
        shape: Shape,
        exclude: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            kind: RuleKind::AllMatches {
                label,
                shape,
                exclude,
            },
        }
    }

    /// Presence flag keyed by the keyword itself.
    pub const fn flag(keyword: &'static str) -> Self {
        Self {
            name: keyword,
            kind: RuleKind::Presence(keyword),
        }
    }

    /// Occurrence count keyed by the token itself.
    pub const fn count(token: &'static str) -> Self {
        Self {
            name: token,
            kind: RuleKind::Count(token),
        }
    }

    pub const fn numbers(name: &'static str, prefix: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::NumberList { prefix },
        }
    }

    /// Full regex for rules that need one, `None` for literal-token rules.
    pub fn pattern(&self) -> Option<String> {
        match self.kind {
            RuleKind::FirstMatch { label, shape } | RuleKind::AllMatches { label, shape, .. } => {
                Some(format!("{}{}{}", label, shape.separator(), shape.value()))
            }
            RuleKind::NumberList { prefix } => Some(format!("{}([0-9]+)", prefix)),
            RuleKind::Presence(_) | RuleKind::Count(_) => None,
        }
    }

    /// Compile this rule's regex, if it has one.
    pub fn compile(&self) -> Result<Option<Regex>, regex::Error> {
        self.pattern().map(|p| Regex::new(&p)).transpose()
    }

    /// Literal token for presence and count rules.
    pub fn token(&self) -> Option<&'static str> {
        match self.kind {
            RuleKind::Presence(t) | RuleKind::Count(t) => Some(t),
            _ => None,
        }
    }
}

/// Device model keyword recognized in exports.
pub const STUDIOLIVE_32SC: &str = "StudioLive 32SC";

/// Rules applied to every export, in no particular order: each rule is
/// independent of the others.
pub const STANDARD_RULES: &[Rule] = &[
    // Identity
    Rule::first("entity_id", "entity_id", Shape::Hex),
    Rule::first("mac_address", "mac_address", Shape::Mac),
    Rule::first("firmware_version", "firmware_version", Shape::Version),
    Rule::flag(STUDIOLIVE_32SC),
    // gPTP
    // Bare or gPTP-prefixed only, not any other `*_grandmaster_id` field
    Rule::first("grandmaster_id", r"(?:gptp_|\b)grandmaster_id", Shape::Hex),
    Rule::first("clock_class", "clock_class", Shape::Unsigned),
    Rule::first("clock_accuracy", "clock_accuracy", Shape::Unsigned),
    Rule::first("log_announce_interval", "log_announce_interval", Shape::Signed),
    Rule::first("log_sync_interval", "log_sync_interval", Shape::Signed),
    Rule::first("log_pdelay_interval", "log_pdelay_interval", Shape::Signed),
    Rule::first("propagation_delay", "propagation_delay", Shape::Unsigned),
    // AVB interface capabilities
    Rule::flag("AS_CAPABLE"),
    Rule::flag("GPTP_ENABLED"),
    Rule::flag("SRP_ENABLED"),
    Rule::flag("GPTP_GRANDMASTER_SUPPORTED"),
    Rule::flag("GPTP_SUPPORTED"),
    // Streams
    Rule::count("stream_input_descriptors"),
    Rule::count("stream_output_descriptors"),
    Rule::count("CONNECTED"),
    Rule::count("NOT_CONNECTED"),
    Rule::all("stream_formats", "stream_format", Shape::Hex, None),
    Rule::all(
        "talker_ids",
        "connected_talker[^0-9A-Fa-fx]*?entity_id",
        Shape::Hex,
        Some(UNCONNECTED_TALKER),
    ),
    // Clock domains
    Rule::count("clock_source_descriptors"),
    Rule::flag("INPUT_STREAM"),
    Rule::flag("INTERNAL"),
    Rule::flag("LOCKED"),
    Rule::flag("UNLOCKED"),
    // Audio
    Rule::numbers("channels", "Channel "),
    Rule::flag("MBLA"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_standard_rules_compile() {
        for rule in STANDARD_RULES {
            assert!(rule.compile().is_ok(), "rule {} failed to compile", rule.name);
        }
    }

    #[test]
    fn test_rule_names_unique() {
        let mut seen = HashSet::new();
        for rule in STANDARD_RULES {
            assert!(seen.insert(rule.name), "duplicate rule name {}", rule.name);
        }
    }

    #[test]
    fn test_token_rules_have_no_pattern() {
        let rule = Rule::flag("MBLA");
        assert_eq!(rule.pattern(), None);
        assert_eq!(rule.token(), Some("MBLA"));
        assert_eq!(rule.compile().unwrap().map(|r| r.as_str().to_string()), None);
    }

    #[test]
    fn test_grandmaster_label() {
        let re = STANDARD_RULES
            .iter()
            .find(|r| r.name == "grandmaster_id")
            .unwrap()
            .compile()
            .unwrap()
            .unwrap();

        let caps = re
            .captures("parent_grandmaster_id: 0x1111 gptp_grandmaster_id: 0x2222")
            .unwrap();
        assert_eq!(&caps[1], "2222");

        let caps = re.captures("\"grandmaster_id\": \"0x0011223344556677\"").unwrap();
        assert_eq!(&caps[1], "0011223344556677");
    }

    #[test]
    fn test_hex_pattern_layout() {
        let rule = Rule::first("entity_id", "entity_id", Shape::Hex);
        assert_eq!(
            rule.pattern().unwrap(),
            r"entity_id[^0-9A-Fa-fx]*?0x([0-9A-Fa-f]+)"
        );
    }

    #[test]
    fn test_signed_shape_captures_minus() {
        let re = Rule::first("x", "log_sync_interval", Shape::Signed)
            .compile()
            .unwrap()
            .unwrap();
        let caps = re.captures("log_sync_interval = -3,").unwrap();
        assert_eq!(&caps[1], "-3");
    }

    #[test]
    fn test_separator_does_not_eat_value_digits() {
        let re = Rule::first("x", "clock_class", Shape::Unsigned)
            .compile()
            .unwrap()
            .unwrap();
        let caps = re.captures("clock_class\":\t248").unwrap();
        assert_eq!(&caps[1], "248");
    }

    #[test]
    fn test_mac_shape() {
        let re = Rule::first("x", "mac_address", Shape::Mac)
            .compile()
            .unwrap()
            .unwrap();
        let caps = re.captures("mac_address = 00:0a:92:e0:e9:35;").unwrap();
        assert_eq!(&caps[1], "00:0a:92:e0:e9:35");

        // A colon cannot be skipped, so it is read as the start of the value
        assert!(re.captures("mac_address: 00:0a:92:e0:e9:35").is_none());
    }
}
