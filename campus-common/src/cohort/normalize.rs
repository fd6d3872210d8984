//! Cohort value normalization
//!
//! Reduces human-entered cohort values ("3rd Year", "Section A", "cse, ece")
//! to canonical tokens. All functions are pure and infallible: malformed
//! input degrades to a best-effort token rather than failing the request,
//! because the source data is operator-entered and inconsistent.

use std::collections::BTreeSet;

/// Fallback year used when a year value contains no digits at all.
pub const DEFAULT_YEAR: &str = "1";

/// Reduce a year value to its digits ("3rd Year" -> "3", "Year 2" -> "2").
///
/// Accepts string or numeric renderings of the same year. Input without any
/// digits falls back to [`DEFAULT_YEAR`].
pub fn normalize_year(raw: &str) -> String {
    let digits = year_digits(raw);
    if digits.is_empty() {
        DEFAULT_YEAR.to_string()
    } else {
        digits
    }
}

/// Digits of a year value, without the default fallback.
///
/// Query code uses this directly so that an empty or digit-free year acts as
/// "no constraint" instead of silently becoming the default year.
pub fn year_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonical section token: strips a leading literal "Section" word, trims,
/// and upper-cases ("Section a" -> "A").
pub fn normalize_section(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = strip_prefix_ignore_case(trimmed, "SECTION").unwrap_or(trimmed);
    stripped.trim().to_uppercase()
}

/// Canonical branch token: trimmed and upper-cased ("cse " -> "CSE").
pub fn normalize_branch(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Split a multi-valued field on commas and whitespace into a set of
/// upper-cased tokens ("A, b" -> {"A", "B"}, "CSE ECE" -> {"CSE", "ECE"}).
///
/// Empty fragments are dropped, so `",, A"` yields just `{"A"}`.
pub fn token_set(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}
