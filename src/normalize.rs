//! Query normalization: lower-casing, tokenization and synonym canonicalization.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Synonym Table
// ============================================================================

lazy_static! {
    /// Spelling variant -> canonical token.
    ///
    /// Keys are single alphanumeric tokens. Punctuated spellings ("wi-fi",
    /// "can't") are split before lookup and never reach this table.
    static ref SYNONYMS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("wireless", "wifi"),
            ("microphone", "mic"),
            ("printing", "printer"),
            ("passcode", "password"),
            ("signin", "login"),
            ("cannot", "cant"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Canonical form of a single word, or the word itself
pub fn canonical(word: &str) -> &str {
    SYNONYMS.get(word).copied().unwrap_or(word)
}

// ============================================================================
// Tokenization
// ============================================================================

/// Normalize free text into canonical tokens.
///
/// Lower-cases, replaces every character that is not a letter or digit with
/// whitespace, splits, and maps each token through the synonym table. Order
/// is preserved; duplicates are kept. "Wi-Fi" therefore yields `wi`, `fi`.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .map(|token| canonical(token).to_string())
        .collect()
}

/// Distinct canonical tokens of `text`
pub fn token_set(text: &str) -> HashSet<String> {
    normalize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n ").is_empty());
        assert!(normalize("?!... ---").is_empty());
    }

    #[test]
    fn test_lowercase_and_split() {
        assert_eq!(
            normalize("Wifi NOT   connecting!!"),
            vec!["wifi", "not", "connecting"]
        );
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize("wireless"), vec!["wifi"]);
        assert_eq!(normalize("signin microphone"), vec!["login", "mic"]);
        assert_eq!(normalize("I cannot print"), vec!["i", "cant", "print"]);
        assert_eq!(normalize("Printing passcode"), vec!["printer", "password"]);
    }

    #[test]
    fn test_hyphen_and_apostrophe_split_before_synonyms() {
        assert_eq!(normalize("Wi-Fi"), vec!["wi", "fi"]);
        assert_eq!(normalize("(wi-fi)."), vec!["wi", "fi"]);
        assert_eq!(normalize("E-mail"), vec!["e", "mail"]);
        assert_eq!(normalize("can't sign-in"), vec!["can", "t", "sign", "in"]);
        assert_eq!(normalize("can’t log-in"), vec!["can", "t", "log", "in"]);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        assert_eq!(
            normalize("ipconfig/flushdns && renew"),
            vec!["ipconfig", "flushdns", "renew"]
        );
    }

    #[test]
    fn test_unicode_letters_preserved() {
        assert_eq!(normalize("Café Ünïcode"), vec!["café", "ünïcode"]);
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(normalize("xyzzy123 qqqq"), vec!["xyzzy123", "qqqq"]);
    }

    #[test]
    fn test_token_set_dedupes() {
        let set = token_set("wifi WIFI wireless");
        assert_eq!(set.len(), 1);
        assert!(set.contains("wifi"));
    }
}
