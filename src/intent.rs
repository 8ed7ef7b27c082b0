//! Phrase-level intent rules evaluated against the raw query text.
//!
//! Token overlap under-weights multi-word phrases such as "wifi connected but
//! no internet". Each rule pairs a case-insensitive pattern with a boost; the
//! boost lands on a guide only when one of the rule's label words also occurs
//! in that guide's haystack.

use lazy_static::lazy_static;
use regex::Regex;

/// One weighted phrase rule
#[derive(Debug)]
pub struct IntentRule {
    /// Space-separated words gating which guides the rule can boost
    pub label: &'static str,
    pub pattern: Regex,
    pub weight: f64,
}

impl IntentRule {
    fn new(label: &'static str, pattern: &str, weight: f64) -> Self {
        Self {
            label,
            pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
            weight,
        }
    }

    pub fn matches_query(&self, raw_query: &str) -> bool {
        self.pattern.is_match(raw_query)
    }

    /// Whether any label word is a substring of the lower-cased haystack
    pub fn applies_to(&self, haystack: &str) -> bool {
        self.label
            .split_whitespace()
            .any(|word| haystack.contains(word))
    }
}

lazy_static! {
    pub static ref INTENT_RULES: Vec<IntentRule> = vec![
        IntentRule::new(
            "wifi no internet",
            r"(wifi|wi-?fi).*(no|not).*(internet|access)|no.*internet.*(wifi|wi-?fi)",
            2.5,
        ),
        IntentRule::new("cant login", r"(can.?t|cannot|unable).*(log.?in|sign.?in)", 2.0),
        IntentRule::new("reset password", r"(reset|forgot).*(password)", 2.0),
        IntentRule::new(
            "printer missing",
            r"(printer).*(not|missing|can.?t).*(show|find|see|add)",
            1.8,
        ),
        IntentRule::new("mfa issue", r"(mfa|2fa|authenticator).*(code|setup|reset|change)", 1.5),
        IntentRule::new("dns flush", r"(dns).*(flush|clear)", 1.5),
        IntentRule::new("renew ip", r"(renew).*(ip)", 1.5),
        IntentRule::new("teams mic", r"(teams).*(mic|microphone|audio)", 1.5),
        IntentRule::new("zoom audio", r"(zoom).*(audio|mic|microphone)", 1.3),
        IntentRule::new("clear cache", r"(clear).*(cache|cookies)", 1.0),
    ];
}

/// Rules whose pattern matches `raw_query`, independent of any guide
pub fn matching_rules(raw_query: &str) -> Vec<&'static IntentRule> {
    INTENT_RULES
        .iter()
        .filter(|rule| rule.matches_query(raw_query))
        .collect()
}

/// Summed weight of the `fired` rules that apply to `haystack`, plus their labels
pub fn intent_boost(fired: &[&'static IntentRule], haystack: &str) -> (f64, Vec<&'static str>) {
    let mut total = 0.0;
    let mut labels = Vec::new();
    for rule in fired.iter().filter(|rule| rule.applies_to(haystack)) {
        total += rule.weight;
        labels.push(rule.label);
    }
    (total, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(query: &str) -> Vec<&'static str> {
        matching_rules(query).iter().map(|r| r.label).collect()
    }

    #[test]
    fn test_wifi_no_internet_phrase() {
        assert_eq!(labels("Wi-Fi connected but no internet"), vec!["wifi no internet"]);
        assert_eq!(labels("no internet on wifi"), vec!["wifi no internet"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(labels("FORGOT my PASSWORD"), vec!["reset password"]);
        assert_eq!(labels("Can't sign in to Canvas"), vec!["cant login"]);
    }

    #[test]
    fn test_multiple_rules_fire() {
        let fired = labels("dns flush and renew ip");
        assert!(fired.contains(&"dns flush"));
        assert!(fired.contains(&"renew ip"));
    }

    #[test]
    fn test_no_rules_for_gibberish() {
        assert!(labels("xyzzy123 qqqq").is_empty());
        assert!(labels("").is_empty());
    }

    #[test]
    fn test_boost_gated_by_haystack() {
        let fired = matching_rules("teams mic is broken");
        let (boost, hit) = intent_boost(&fired, "microsoft teams mic not working audio/video");
        assert_eq!(boost, 1.5);
        assert_eq!(hit, vec!["teams mic"]);

        let (boost, hit) = intent_boost(&fired, "add a campus printer printing");
        assert_eq!(boost, 0.0);
        assert!(hit.is_empty());
    }

    #[test]
    fn test_boosts_are_additive() {
        let fired = matching_rules("dns flush then renew ip");
        let (boost, _) = intent_boost(&fired, "networking dns ip renew");
        assert!((boost - 3.0).abs() < 1e-9);
    }
}
