//! Parsed cohort field values

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The wildcard token: a field holding it matches every query value.
pub const WILDCARD: &str = "ALL";

/// A stored cohort field, parsed once at the store boundary.
///
/// Stored fields are loosely typed strings that may hold a single token
/// ("A"), a comma/space-separated list ("13, A"), or the wildcard "ALL" in
/// any case. Parsing up front means matching never re-tokenizes raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CohortField {
    /// Field holds the wildcard token; matches any query value.
    Wildcard,
    /// Concrete token set. May be empty, in which case the field matches
    /// nothing (year, section) or anything (branch, see matching rules).
    Tokens(BTreeSet<String>),
}

impl CohortField {
    /// Parse a year field ("3", "3rd Year", "2, 3", "ALL").
    ///
    /// Each token is reduced to its digits; tokens without digits are
    /// dropped so a garbage year never matches by accident.
    pub fn year(raw: &str) -> Self {
        Self::parse(raw, |token| {
            let digits = super::normalize::year_digits(token);
            (!digits.is_empty()).then_some(digits)
        })
    }

    /// Parse a section field ("A", "Section A", "13, A", "All Sections").
    ///
    /// "ALL SECTIONS" tokenizes to {ALL, SECTIONS}, so the wildcard check
    /// covers that spelling without a special case.
    pub fn section(raw: &str) -> Self {
        Self::parse(raw, |token| Some(token.to_string()))
    }

    /// Parse a branch field ("CSE", "cse, ece", "ALL", or empty on legacy
    /// records).
    pub fn branch(raw: &str) -> Self {
        Self::parse(raw, |token| Some(token.to_string()))
    }

    fn parse<F>(raw: &str, keep: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tokens = BTreeSet::new();
        for part in raw.split(|c: char| c == ',' || c.is_whitespace()) {
            let token = part.trim().to_uppercase();
            if token.is_empty() {
                continue;
            }
            if token == WILDCARD {
                return Self::Wildcard;
            }
            if let Some(kept) = keep(&token) {
                tokens.insert(kept);
            }
        }
        Self::Tokens(tokens)
    }

    /// True when the field holds the wildcard token.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Concrete tokens, empty for the wildcard.
    pub fn tokens(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Wildcard => None,
            Self::Tokens(tokens) => Some(tokens),
        }
    }
}
