use regex::Regex;

use crate::{FailureKind, FetchError};

/// Decides whether a scraped PDF address is the wanted document edition.
///
/// Implementations receive the address lower-cased.
pub trait MatchRule: Send + Sync {
    fn matches(&self, lowered_url: &str) -> bool;

    fn describe(&self) -> String;
}

/// Address contains `code` and matches `<code>.*<marker>.*\.pdf$`.
///
/// With marker `e` this picks the English edition out of the language
/// variants that share one numeric regulation code.
#[derive(Debug, Clone)]
pub struct CodeLanguageRule {
    code: String,
    pattern: Regex,
}

impl CodeLanguageRule {
    pub fn new(code: &str, marker: &str) -> Result<Self, FetchError> {
        let code = code.trim().to_lowercase();
        let marker = marker.trim().to_lowercase();
        if code.is_empty() {
            return Err(FetchError::new(
                FailureKind::InvalidRule,
                "document code must not be empty",
            ));
        }
        let pattern = Regex::new(&format!(
            r"{}.*{}.*\.pdf$",
            regex::escape(&code),
            regex::escape(&marker)
        ))
        .map_err(|err| FetchError::new(FailureKind::InvalidRule, err.to_string()))?;
        Ok(Self { code, pattern })
    }

    /// English-edition rule for a document code.
    pub fn english(code: &str) -> Result<Self, FetchError> {
        Self::new(code, "e")
    }
}

impl MatchRule for CodeLanguageRule {
    fn matches(&self, lowered_url: &str) -> bool {
        lowered_url.contains(&self.code) && self.pattern.is_match(lowered_url)
    }

    fn describe(&self) -> String {
        format!("code {} /{}/", self.code, self.pattern.as_str())
    }
}

/// Free-form regular expression applied to the lower-cased address.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
}

impl PatternRule {
    pub fn new(pattern: &str) -> Result<Self, FetchError> {
        let pattern = Regex::new(pattern)
            .map_err(|err| FetchError::new(FailureKind::InvalidRule, err.to_string()))?;
        Ok(Self { pattern })
    }
}

impl MatchRule for PatternRule {
    fn matches(&self, lowered_url: &str) -> bool {
        self.pattern.is_match(lowered_url)
    }

    fn describe(&self) -> String {
        format!("/{}/", self.pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowered(url: &str) -> String {
        url.to_lowercase()
    }

    #[test]
    fn english_edition_is_retained() {
        let rule = CodeLanguageRule::english("155").unwrap();
        assert!(rule.matches(&lowered(
            "https://unece.org/sites/default/files/2024-03/R155e%20(2).pdf"
        )));
    }

    #[test]
    fn other_language_editions_are_rejected() {
        let rule = CodeLanguageRule::english("155").unwrap();
        assert!(!rule.matches("https://unece.org/files/2024-03/r155f.pdf"));
        assert!(!rule.matches("https://unece.org/files/2024-03/r155r.pdf"));
    }

    #[test]
    fn wrong_code_is_rejected() {
        let rule = CodeLanguageRule::english("155").unwrap();
        assert!(!rule.matches("https://unece.org/files/2024-03/r156e.pdf"));
    }

    #[test]
    fn pdf_must_end_the_address() {
        let rule = CodeLanguageRule::english("155").unwrap();
        assert!(!rule.matches("https://unece.org/files/2024-03/r155e.pdf?download=1"));
    }

    #[test]
    fn code_is_escaped_in_pattern() {
        let rule = CodeLanguageRule::new("10.1", "e").unwrap();
        assert!(rule.matches("https://ex.org/2020-01/r10.1e.pdf"));
        assert!(!rule.matches("https://ex.org/2020-01/r1001e.pdf"));
    }

    #[test]
    fn empty_code_is_an_invalid_rule() {
        let err = CodeLanguageRule::new("  ", "e").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidRule);
    }

    #[test]
    fn pattern_rule_reports_bad_regex() {
        let err = PatternRule::new("155(").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidRule);
        assert!(PatternRule::new(r"r155e\.pdf$")
            .unwrap()
            .matches("https://x/2021-01/r155e.pdf"));
    }
}
