//! Administrative operations

use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::error::ApiError;
use crate::{projection, AppState};

/// POST /api/v1/admin/resync-assignments
///
/// Rebuild every faculty projection from the canonical assignment set.
/// Idempotent; safe to trigger repeatedly.
pub async fn resync_assignments(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = projection::resync_all(&state.db).await?;

    Ok(Json(json!({
        "message": format!(
            "Synced assignments for {} faculty members",
            report.faculty_count
        ),
        "facultyCount": report.faculty_count,
        "slotCount": report.slot_count,
    })))
}
