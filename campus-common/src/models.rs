//! Data models for students, faculty, and teaching assignments
//!
//! Field names serialize in camelCase to match what the dashboards expect
//! on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cohort::{normalize, CohortQuery, RecordCohort};

/// Canonical teaching-assignment record: the authoritative statement of
/// what a faculty member teaches to which cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub faculty_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: String,
    pub year: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AssignmentRecord {
    /// Projection slot for this record, cohort fields normalized.
    pub fn teaching_slot(&self) -> TeachingSlot {
        TeachingSlot::normalized(
            &self.year,
            &self.section,
            &self.subject,
            self.branch.as_deref(),
            self.semester.as_deref(),
        )
    }

    /// Parsed cohort fields for membership tests.
    pub fn record_cohort(&self) -> RecordCohort {
        RecordCohort::new(&self.year, &self.section, self.branch.as_deref())
    }
}

/// One entry in the faculty projection array: a denormalized copy of an
/// assignment's cohort fields, kept on the faculty row for fast
/// faculty-to-student matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingSlot {
    pub year: String,
    pub section: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

impl TeachingSlot {
    /// Build a slot with cohort fields normalized. An empty branch stays
    /// absent rather than becoming an empty token.
    pub fn normalized(
        year: &str,
        section: &str,
        subject: &str,
        branch: Option<&str>,
        semester: Option<&str>,
    ) -> Self {
        let branch = branch
            .map(normalize::normalize_branch)
            .filter(|b| !b.is_empty());
        Self {
            year: normalize::normalize_year(year),
            section: normalize::normalize_section(section),
            subject: subject.trim().to_string(),
            branch,
            semester: semester.map(|s| s.trim().to_string()),
        }
    }

    /// Structural-equality key for projection sync.
    ///
    /// Semester is deliberately excluded: a semester-only edit is a sync
    /// no-op, and only a full resync refreshes stored semester values.
    pub fn sync_key(&self) -> (String, String, String, String) {
        (
            normalize::normalize_year(&self.year),
            normalize::normalize_section(&self.section),
            self.subject.trim().to_string(),
            self.branch
                .as_deref()
                .map(normalize::normalize_branch)
                .unwrap_or_default(),
        )
    }

    /// Parsed cohort fields for membership tests.
    pub fn record_cohort(&self) -> RecordCohort {
        RecordCohort::new(&self.year, &self.section, self.branch.as_deref())
    }
}

/// Faculty member, with the embedded projection of their teaching
/// assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub faculty_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    /// Denormalized copy of this faculty's assignment cohorts. Best-effort
    /// consistent with the canonical records; rebuilt by resync.
    pub assignments: Vec<TeachingSlot>,
    pub created_at: DateTime<Utc>,
}

/// Student roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub sid: String,
    pub name: String,
    pub email: String,
    pub year: i64,
    pub semester: i64,
    pub branch: String,
    pub section: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// This student's cohort as a membership query.
    pub fn cohort_query(&self) -> CohortQuery {
        CohortQuery::new(&self.year.to_string(), &self.section, &self.branch)
    }
}
