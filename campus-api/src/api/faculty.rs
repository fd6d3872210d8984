//! Faculty endpoints
//!
//! Besides plain CRUD, this carries the two cohort-scoped dashboard views:
//! the student's "who teaches me" query and the faculty's class roster.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_common::cohort::CohortQuery;
use campus_common::events::ChangeEvent;
use campus_common::models::{Faculty, Student, TeachingSlot};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::StringOrNumber;
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPayload {
    pub year: StringOrNumber,
    pub section: String,
    pub subject: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
}

impl SlotPayload {
    /// Normalize into a projection slot. A missing branch on a
    /// manually-entered slot defaults to CSE, matching the legacy admin
    /// forms.
    fn into_slot(self) -> TeachingSlot {
        let year = self.year.into_string();
        TeachingSlot::normalized(
            &year,
            &self.section,
            &self.subject,
            Some(self.branch.as_deref().unwrap_or("CSE")),
            self.semester.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFacultyPayload {
    pub faculty_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub assignments: Vec<SlotPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacultyPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub assignments: Option<Vec<SlotPayload>>,
}

/// Query parameters for the teaching-faculty view
#[derive(Debug, Deserialize)]
pub struct TeachingQuery {
    pub year: Option<String>,
    pub section: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

/// GET /api/v1/faculty
pub async fn list_faculty(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, ApiError> {
    Ok(Json(db::faculty::list(&state.db).await?))
}

/// GET /api/v1/faculty/:id
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<Faculty>, ApiError> {
    Ok(Json(db::faculty::get(&state.db, &faculty_id).await?))
}

/// POST /api/v1/faculty
pub async fn register_faculty(
    State(state): State<AppState>,
    Json(payload): Json<RegisterFacultyPayload>,
) -> Result<(StatusCode, Json<Faculty>), ApiError> {
    if payload.faculty_id.trim().is_empty() {
        return Err(ApiError::BadRequest("facultyId is required".to_string()));
    }

    let faculty = Faculty {
        faculty_id: payload.faculty_id.trim().to_string(),
        name: payload.name,
        email: payload.email,
        department: payload.department.unwrap_or_else(|| "CSE".to_string()),
        assignments: payload
            .assignments
            .into_iter()
            .map(SlotPayload::into_slot)
            .collect(),
        created_at: Utc::now(),
    };

    db::faculty::insert(&state.db, &faculty).await?;

    state
        .broadcaster
        .publish(ChangeEvent::created("faculty", &faculty));

    Ok((StatusCode::CREATED, Json(faculty)))
}

/// PUT /api/v1/faculty/:id
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Json(payload): Json<UpdateFacultyPayload>,
) -> Result<Json<Faculty>, ApiError> {
    let mut faculty = db::faculty::get(&state.db, &faculty_id).await?;

    if let Some(name) = payload.name {
        faculty.name = name;
    }
    if let Some(email) = payload.email {
        faculty.email = email;
    }
    if let Some(department) = payload.department {
        faculty.department = department;
    }
    if let Some(assignments) = payload.assignments {
        faculty.assignments = assignments.into_iter().map(SlotPayload::into_slot).collect();
    }

    db::faculty::update(&state.db, &faculty).await?;

    state
        .broadcaster
        .publish(ChangeEvent::updated("faculty", &faculty));

    Ok(Json(faculty))
}

/// DELETE /api/v1/faculty/:id
///
/// Cascades to the faculty's canonical assignments.
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::faculty::delete(&state.db, &faculty_id).await?;

    state
        .broadcaster
        .publish(ChangeEvent::deleted("faculty", &faculty_id));

    Ok(Json(
        json!({ "message": "Faculty and all associated data deleted" }),
    ))
}

/// GET /api/v1/faculty/teaching?year=&section=&branch=
///
/// Faculty whose projection covers the given cohort, with each slot list
/// filtered to the matching subset. Year and section are required; branch
/// is optional (legacy records predate it).
pub async fn teaching_faculty(
    State(state): State<AppState>,
    Query(params): Query<TeachingQuery>,
) -> Result<Json<Vec<Faculty>>, ApiError> {
    let (Some(year), Some(section)) = (params.year.as_deref(), params.section.as_deref()) else {
        return Err(ApiError::BadRequest("Year and Section required".to_string()));
    };

    let query = CohortQuery::new(year, section, params.branch.as_deref().unwrap_or(""));
    Ok(Json(db::faculty::teaching_faculty_for(&state.db, &query).await?))
}

/// GET /api/v1/faculty/:id/students
///
/// The faculty dashboard roster: students covered by any projection slot.
pub async fn faculty_students(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let faculty = db::faculty::get(&state.db, &faculty_id).await?;
    Ok(Json(
        db::students::students_for_faculty(&state.db, &faculty).await?,
    ))
}
