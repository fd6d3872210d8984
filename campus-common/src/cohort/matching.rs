//! Cohort membership predicate
//!
//! Decides whether a stored record's cohort fields cover a concrete query
//! cohort (one student's year/section/branch). Fields combine with AND; an
//! absent query field is no constraint. Never panics and never errors:
//! invalid input simply fails to match.

use serde::{Deserialize, Serialize};

use super::field::CohortField;
use super::normalize;

/// A concrete cohort to test membership against, normalized on construction.
///
/// Built from query parameters or from a student row. An empty or digit-free
/// field becomes `None` and is skipped when matching, so a blank query value
/// never silently becomes the default year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortQuery {
    pub year: Option<String>,
    pub section: Option<String>,
    pub branch: Option<String>,
}

impl CohortQuery {
    pub fn new(year: &str, section: &str, branch: &str) -> Self {
        let year = normalize::year_digits(year);
        let section = normalize::normalize_section(section);
        let branch = normalize::normalize_branch(branch);
        Self {
            year: (!year.is_empty()).then_some(year),
            section: (!section.is_empty()).then_some(section),
            branch: (!branch.is_empty()).then_some(branch),
        }
    }
}

/// A stored record's cohort fields, parsed once at the store boundary.
///
/// Legacy records predate the branch field; `branch_absent` remembers that
/// the raw value was missing so an absent branch can match any query branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCohort {
    pub year: CohortField,
    pub section: CohortField,
    pub branch: CohortField,
    branch_absent: bool,
}

impl RecordCohort {
    pub fn new(year: &str, section: &str, branch: Option<&str>) -> Self {
        let raw_branch = branch.unwrap_or("");
        Self {
            year: CohortField::year(year),
            section: CohortField::section(section),
            branch: CohortField::branch(raw_branch),
            branch_absent: raw_branch.trim().is_empty(),
        }
    }
}

/// True when `record`'s cohort covers `query`.
///
/// Per-field rules, combined with AND:
/// - a wildcard record field matches unconditionally
/// - year and section match on exact token-set membership after
///   normalization
/// - branch falls back to a bidirectional substring match when no exact
///   token matches, and an absent record branch matches any query branch
/// - a record field with an empty token set matches nothing, so missing
///   data never accidentally matches everything
pub fn matches(record: &RecordCohort, query: &CohortQuery) -> bool {
    token_match(&record.year, query.year.as_deref())
        && token_match(&record.section, query.section.as_deref())
        && branch_match(record, query.branch.as_deref())
}

fn token_match(field: &CohortField, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };
    match field {
        CohortField::Wildcard => true,
        CohortField::Tokens(tokens) => tokens.contains(query),
    }
}

fn branch_match(record: &RecordCohort, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };
    if record.branch_absent {
        return true;
    }
    match &record.branch {
        CohortField::Wildcard => true,
        CohortField::Tokens(tokens) => {
            if tokens.contains(query) {
                return true;
            }
            // Relaxed fallback: "Computer Science" should still find "CSE"
            // entries. Bidirectional, so "CS" matches "CSE" and vice versa;
            // a known false-positive risk carried over from the legacy data.
            tokens
                .iter()
                .any(|token| token.contains(query) || query.contains(token.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: &str, section: &str, branch: Option<&str>) -> RecordCohort {
        RecordCohort::new(year, section, branch)
    }

    #[test]
    fn exact_triple_matches() {
        let rec = record("3", "A", Some("CSE"));
        let query = CohortQuery::new("3", "A", "CSE");
        assert!(matches(&rec, &query));
    }

    #[test]
    fn year_mismatch_fails() {
        let rec = record("3", "A", Some("CSE"));
        assert!(!matches(&rec, &CohortQuery::new("2", "A", "CSE")));
    }

    #[test]
    fn year_matches_across_representations() {
        // "3rd Year" stored, numeric-ish "3" queried
        let rec = record("3rd Year", "A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }

    #[test]
    fn wildcard_section_matches_any_query() {
        for raw in ["ALL", "all", "All Sections"] {
            let rec = record("3", raw, Some("CSE"));
            assert!(
                matches(&rec, &CohortQuery::new("3", "Q", "CSE")),
                "section {raw:?} should be a wildcard"
            );
        }
    }

    #[test]
    fn wildcard_branch_matches_any_query() {
        let rec = record("3", "A", Some("aLl"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "MECH")));
    }

    #[test]
    fn section_list_membership() {
        // Stored as a single comma-joined string, not a proper list
        let rec = record("3", "13, A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "CSE")));
        assert!(matches(&rec, &CohortQuery::new("3", "13", "CSE")));
        assert!(!matches(&rec, &CohortQuery::new("3", "B", "CSE")));
    }

    #[test]
    fn section_prefix_word_is_tolerated() {
        let rec = record("3", "Section A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }

    #[test]
    fn query_section_prefix_is_stripped() {
        let rec = record("3", "A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "Section A", "CSE")));
    }

    #[test]
    fn empty_query_fields_are_no_constraint() {
        let rec = record("3", "A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "", "")));
        assert!(matches(&rec, &CohortQuery::new("", "", "")));
    }

    #[test]
    fn empty_record_section_never_matches() {
        let rec = record("3", "", Some("CSE"));
        assert!(!matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }

    #[test]
    fn absent_branch_matches_any_query_branch() {
        for raw in [None, Some(""), Some("   ")] {
            let rec = record("3", "A", raw);
            assert!(
                matches(&rec, &CohortQuery::new("3", "A", "MECH")),
                "branch {raw:?} should match any query"
            );
        }
    }

    #[test]
    fn branch_substring_fallback_is_bidirectional() {
        // Query inside record token
        let rec = record("3", "A", Some("CSE"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "CS")));
        // Record token inside query
        let rec = record("3", "A", Some("CS"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }

    #[test]
    fn branch_multi_value_membership() {
        let rec = record("3", "A", Some("cse, ece"));
        assert!(matches(&rec, &CohortQuery::new("3", "A", "ECE")));
        assert!(!matches(&rec, &CohortQuery::new("3", "A", "MECH")));
    }

    #[test]
    fn unrelated_branch_fails() {
        let rec = record("3", "A", Some("CIVIL"));
        assert!(!matches(&rec, &CohortQuery::new("3", "A", "ECE")));
    }

    #[test]
    fn section_match_is_exact_not_substring() {
        // "AB" stored must not match query "A"
        let rec = record("3", "AB", Some("CSE"));
        assert!(!matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }

    #[test]
    fn garbage_input_fails_to_match_without_panicking() {
        let rec = record("???", "!!", Some("##"));
        assert!(!matches(&rec, &CohortQuery::new("3", "A", "CSE")));
    }
}
