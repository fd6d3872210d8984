//! Student roster endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_common::cohort::normalize;
use campus_common::events::ChangeEvent;
use campus_common::models::Student;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::StringOrNumber;
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentPayload {
    pub sid: String,
    pub name: String,
    pub email: String,
    pub year: StringOrNumber,
    #[serde(default)]
    pub semester: Option<i64>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub year: Option<StringOrNumber>,
    pub semester: Option<i64>,
    pub branch: Option<String>,
    pub section: Option<String>,
}

fn normalize_year_value(raw: StringOrNumber) -> i64 {
    normalize::normalize_year(&raw.into_string())
        .parse()
        .unwrap_or(1)
}

/// GET /api/v1/students
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(db::students::list(&state.db).await?))
}

/// GET /api/v1/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(db::students::get(&state.db, &sid).await?))
}

/// POST /api/v1/students
pub async fn register_student(
    State(state): State<AppState>,
    Json(payload): Json<RegisterStudentPayload>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    if payload.sid.trim().is_empty() {
        return Err(ApiError::BadRequest("sid is required".to_string()));
    }

    let student = Student {
        sid: payload.sid.trim().to_string(),
        name: payload.name,
        email: payload.email,
        year: normalize_year_value(payload.year),
        semester: payload.semester.unwrap_or(1),
        branch: normalize::normalize_branch(payload.branch.as_deref().unwrap_or("CSE")),
        section: normalize::normalize_section(payload.section.as_deref().unwrap_or("A")),
        created_at: Utc::now(),
    };

    db::students::insert(&state.db, &student).await?;

    state
        .broadcaster
        .publish(ChangeEvent::created("students", &student));

    Ok((StatusCode::CREATED, Json(student)))
}

/// PUT /api/v1/students/:id
pub async fn update_student(
    State(state): State<AppState>,
    Path(sid): Path<String>,
    Json(payload): Json<UpdateStudentPayload>,
) -> Result<Json<Student>, ApiError> {
    let mut student = db::students::get(&state.db, &sid).await?;

    if let Some(name) = payload.name {
        student.name = name;
    }
    if let Some(email) = payload.email {
        student.email = email;
    }
    if let Some(year) = payload.year {
        student.year = normalize_year_value(year);
    }
    if let Some(semester) = payload.semester {
        student.semester = semester;
    }
    if let Some(branch) = payload.branch {
        student.branch = normalize::normalize_branch(&branch);
    }
    if let Some(section) = payload.section {
        student.section = normalize::normalize_section(&section);
    }

    db::students::update(&state.db, &student).await?;

    state
        .broadcaster
        .publish(ChangeEvent::updated("students", &student));

    Ok(Json(student))
}

/// DELETE /api/v1/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::students::delete(&state.db, &sid).await?;

    state
        .broadcaster
        .publish(ChangeEvent::deleted("students", &sid));

    Ok(Json(json!({ "message": "Student deleted" })))
}
