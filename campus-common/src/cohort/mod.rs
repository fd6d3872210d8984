//! Cohort normalization and membership matching
//!
//! A cohort is the (year, section, branch) triple identifying a group of
//! students. Stored cohort fields are operator-entered and loosely typed: a
//! section may be `"A"`, `"Section A"`, `"13, A"`, or the wildcard `"ALL"`;
//! a branch may be missing entirely on legacy records. Raw fields are parsed
//! exactly once at the store boundary into [`CohortField`] values; the
//! matching code never sees raw strings.

mod field;
mod matching;
pub mod normalize;

pub use field::CohortField;
pub use matching::{matches, CohortQuery, RecordCohort};
