//! Teaching-assignment endpoints
//!
//! The write path runs in a fixed order: canonical write first, then the
//! best-effort projection sync, then the change broadcast. Sync and
//! broadcast can never un-succeed the canonical write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use campus_common::cohort::{normalize, CohortQuery};
use campus_common::events::ChangeEvent;
use campus_common::models::AssignmentRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::error::ApiError;
use super::StringOrNumber;
use crate::{db, projection, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentPayload {
    pub faculty_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    pub year: StringOrNumber,
    pub section: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentPayload {
    pub faculty_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub year: Option<StringOrNumber>,
    pub section: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Query parameters for the student assignment view
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid assignment id: {}", raw)))
}

/// POST /api/v1/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<(StatusCode, Json<AssignmentRecord>), ApiError> {
    if payload.faculty_id.trim().is_empty() {
        return Err(ApiError::BadRequest("facultyId is required".to_string()));
    }

    let record = AssignmentRecord {
        id: Uuid::new_v4(),
        faculty_id: payload.faculty_id.trim().to_string(),
        title: payload.title,
        description: payload.description,
        subject: payload.subject,
        year: normalize::normalize_year(&payload.year.into_string()),
        section: normalize::normalize_section(&payload.section),
        branch: payload.branch,
        semester: payload.semester,
        due_date: payload.due_date,
        created_at: Utc::now(),
    };

    db::assignments::insert(&state.db, &record).await?;

    projection::on_create(&state.db, &record).await;

    state
        .broadcaster
        .publish(ChangeEvent::created("assignments", &record));

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/v1/assignments/:id
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAssignmentPayload>,
) -> Result<Json<AssignmentRecord>, ApiError> {
    let id = parse_id(&id)?;
    let old = db::assignments::get(&state.db, id).await?;

    let mut record = old.clone();
    if let Some(faculty_id) = payload.faculty_id {
        record.faculty_id = faculty_id.trim().to_string();
    }
    if let Some(title) = payload.title {
        record.title = title;
    }
    if let Some(description) = payload.description {
        record.description = Some(description);
    }
    if let Some(subject) = payload.subject {
        record.subject = subject;
    }
    if let Some(year) = payload.year {
        record.year = normalize::normalize_year(&year.into_string());
    }
    if let Some(section) = payload.section {
        record.section = normalize::normalize_section(&section);
    }
    if let Some(branch) = payload.branch {
        record.branch = Some(branch);
    }
    if let Some(semester) = payload.semester {
        record.semester = Some(semester);
    }
    if let Some(due_date) = payload.due_date {
        record.due_date = Some(due_date);
    }

    db::assignments::update(&state.db, &record).await?;

    projection::on_update(&state.db, &old, &record).await;

    state
        .broadcaster
        .publish(ChangeEvent::updated("assignments", &record));

    Ok(Json(record))
}

/// DELETE /api/v1/assignments/:id
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    let removed = db::assignments::delete(&state.db, id).await?;

    projection::on_delete(&state.db, &removed).await;

    state
        .broadcaster
        .publish(ChangeEvent::deleted("assignments", &removed.id.to_string()));

    Ok(Json(json!({ "message": "Assignment deleted" })))
}

/// GET /api/v1/assignments/faculty/:id
pub async fn faculty_assignments(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<Vec<AssignmentRecord>>, ApiError> {
    Ok(Json(
        db::assignments::list_for_faculty(&state.db, &faculty_id).await?,
    ))
}

/// GET /api/v1/assignments/student?year=&section=&branch=
///
/// Assignments whose cohort covers the student, newest first. Empty
/// parameters act as no constraint.
pub async fn student_assignments(
    State(state): State<AppState>,
    Query(params): Query<StudentQuery>,
) -> Result<Json<Vec<AssignmentRecord>>, ApiError> {
    let query = CohortQuery::new(
        params.year.as_deref().unwrap_or(""),
        params.section.as_deref().unwrap_or(""),
        params.branch.as_deref().unwrap_or(""),
    );
    Ok(Json(
        db::assignments::list_for_student(&state.db, &query).await?,
    ))
}
