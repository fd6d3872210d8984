//! HTTP request handlers
//!
//! Write handlers orchestrate the full write path: validate input,
//! normalize cohort fields, persist the canonical record, invoke the
//! projection synchronizer (best-effort), publish a change event, respond.
//! The canonical write is always considered to have succeeded before sync
//! and broadcast run; neither can fail the request.

mod admin;
mod assignments;
mod error;
mod faculty;
mod health;
mod students;
mod stream;

pub use admin::resync_assignments;
pub use assignments::{
    create_assignment, delete_assignment, faculty_assignments, student_assignments,
    update_assignment,
};
pub use error::ApiError;
pub use faculty::{
    delete_faculty, faculty_students, get_faculty, list_faculty, register_faculty,
    teaching_faculty, update_faculty,
};
pub use health::health_check;
pub use students::{delete_student, get_student, list_students, register_student, update_student};
pub use stream::stream;

use serde::Deserialize;

/// A field that dashboards send as either a bare number or a string
/// ("year": 3 vs "year": "3rd Year"). Admin forms and older clients
/// disagree, so write handlers accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Number(i64),
    Text(String),
}

impl StringOrNumber {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t,
        }
    }
}
