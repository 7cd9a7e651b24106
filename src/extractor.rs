//! Rule-driven extraction of findings from decoded export text.
//!
//! Regex rules run one at a time over the whole text. Presence and count
//! rules share a single Aho-Corasick automaton, so all keywords are found in
//! one pass.

use crate::rules::{Rule, RuleKind, STANDARD_RULES};
use crate::types::{FindingValue, Findings};
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use thiserror::Error;

/// A rule table that cannot be turned into an [`Extractor`].
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern for rule '{name}': {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("failed to build keyword automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// Compiled form of a rule table.
#[derive(Debug, Clone)]
pub struct Extractor {
    regex_rules: Vec<(Rule, Regex)>,
    /// Token rules with the automaton pattern index they read from
    token_rules: Vec<(Rule, usize)>,
    keywords: Option<AhoCorasick>,
    keyword_count: usize,
}

impl Extractor {
    /// Compile a rule table.
    pub fn new(rules: &[Rule]) -> Result<Self, RuleError> {
        let mut regex_rules = Vec::new();
        let mut token_rules = Vec::new();
        let mut tokens: Vec<&'static str> = Vec::new();

        for rule in rules {
            if let Some(token) = rule.token() {
                if token.is_empty() {
                    tracing::debug!("extractor: skipping empty token for rule '{}'", rule.name);
                    continue;
                }
                let idx = match tokens.iter().position(|t| *t == token) {
                    Some(i) => i,
                    None => {
                        tokens.push(token);
                        tokens.len() - 1
                    }
                };
                token_rules.push((*rule, idx));
            } else if let Some(pattern) = rule.pattern() {
                let regex = Regex::new(&pattern).map_err(|source| RuleError::Pattern {
                    name: rule.name,
                    source,
                })?;
                regex_rules.push((*rule, regex));
            }
        }

        let keywords = if tokens.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&tokens)?)
        };

        tracing::debug!(
            "extractor: compiled {} regex rules, {} keyword rules over {} tokens",
            regex_rules.len(),
            token_rules.len(),
            tokens.len()
        );

        Ok(Self {
            regex_rules,
            token_rules,
            keywords,
            keyword_count: tokens.len(),
        })
    }

    /// The extractor for [`STANDARD_RULES`], compiled once per process.
    pub fn standard() -> &'static Extractor {
        static CACHE: OnceLock<Extractor> = OnceLock::new();
        CACHE.get_or_init(|| Extractor::new(STANDARD_RULES).expect("standard rules are valid"))
    }

    /// Apply every rule to `text`. Never fails; unmatched rules leave no key.
    pub fn extract(&self, text: &str) -> Findings {
        let mut findings = Findings::new();

        for (rule, regex) in &self.regex_rules {
            if let Some(value) = apply_regex_rule(rule, regex, text) {
                findings.insert(rule.name, value);
            }
        }

        let counts = self.count_keywords(text);
        for (rule, idx) in &self.token_rules {
            let n = counts[*idx];
            if n == 0 {
                continue;
            }
            match rule.kind {
                RuleKind::Presence(_) => findings.insert(rule.name, FindingValue::Present),
                RuleKind::Count(_) => findings.insert(rule.name, FindingValue::Count(n)),
                _ => {}
            }
        }

        tracing::debug!("extractor: {} findings from {} chars", findings.len(), text.len());
        findings
    }

    /// Non-overlapping occurrence count per token, each token counted on its
    /// own so a token nested in another is still found.
    fn count_keywords(&self, text: &str) -> Vec<usize> {
        let mut counts = vec![0usize; self.keyword_count];
        let Some(ac) = &self.keywords else {
            return counts;
        };

        // Matches of one pattern arrive in end order; for a fixed-length
        // pattern that is start order too.
        let mut last_end = vec![0usize; self.keyword_count];
        for m in ac.find_overlapping_iter(text) {
            let p = m.pattern().as_usize();
            if m.start() >= last_end[p] {
                counts[p] += 1;
                last_end[p] = m.end();
            }
        }
        counts
    }
}

/// Unsigned decimal of any length, ordered by numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecimalKey(String);

impl DecimalKey {
    /// `digits` must be ASCII digits; leading zeros are dropped.
    fn new(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        DecimalKey(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }
}

impl Ord for DecimalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DecimalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn apply_regex_rule(rule: &Rule, regex: &Regex, text: &str) -> Option<FindingValue> {
    match rule.kind {
        RuleKind::FirstMatch { .. } => regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| FindingValue::Text(m.as_str().to_string())),
        RuleKind::AllMatches { exclude, .. } => {
            let values: BTreeSet<String> = regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .filter(|v| Some(*v) != exclude)
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(FindingValue::Set(values))
            }
        }
        RuleKind::NumberList { .. } => {
            let numbers: BTreeSet<DecimalKey> = regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| DecimalKey::new(m.as_str()))
                .collect();
            let min = numbers.first()?.0.clone();
            let max = numbers.last()?.0.clone();
            Some(FindingValue::Numbers {
                distinct: numbers.len(),
                min,
                max,
            })
        }
        RuleKind::Presence(_) | RuleKind::Count(_) => None,
    }
}

/// Extract findings with the standard rule table.
pub fn extract(text: &str) -> Findings {
    Extractor::standard().extract(text)
}
