//! Faculty store queries
//!
//! The `assignments` column holds the denormalized projection of a faculty
//! member's teaching assignments as a JSON array of slots. It is decoded
//! leniently: a malformed column value degrades to an empty projection with
//! a warning, since a resync can always rebuild it.

use campus_common::cohort::{self, CohortQuery};
use campus_common::models::{Faculty, TeachingSlot};
use campus_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::warn;

fn decode_slots(faculty_id: &str, raw: &str) -> Vec<TeachingSlot> {
    match serde_json::from_str(raw) {
        Ok(slots) => slots,
        Err(e) => {
            warn!(
                "Malformed projection column for faculty {}: {} (treating as empty)",
                faculty_id, e
            );
            Vec::new()
        }
    }
}

fn faculty_from_row(row: &SqliteRow) -> Faculty {
    let faculty_id: String = row.get("faculty_id");
    let raw: String = row.get("assignments");
    let assignments = decode_slots(&faculty_id, &raw);
    Faculty {
        faculty_id,
        name: row.get("name"),
        email: row.get("email"),
        department: row.get("department"),
        assignments,
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

pub async fn list(db: &SqlitePool) -> Result<Vec<Faculty>> {
    let rows = sqlx::query("SELECT * FROM faculty ORDER BY faculty_id")
        .fetch_all(db)
        .await?;
    Ok(rows.iter().map(faculty_from_row).collect())
}

pub async fn get(db: &SqlitePool, faculty_id: &str) -> Result<Faculty> {
    let row = sqlx::query("SELECT * FROM faculty WHERE faculty_id = ?")
        .bind(faculty_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Faculty {}", faculty_id)))?;
    Ok(faculty_from_row(&row))
}

pub async fn insert(db: &SqlitePool, faculty: &Faculty) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO faculty (faculty_id, name, email, department, assignments, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&faculty.faculty_id)
    .bind(&faculty.name)
    .bind(&faculty.email)
    .bind(&faculty.department)
    .bind(serde_json::to_string(&faculty.assignments)?)
    .bind(faculty.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update(db: &SqlitePool, faculty: &Faculty) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE faculty
        SET name = ?, email = ?, department = ?, assignments = ?
        WHERE faculty_id = ?
        "#,
    )
    .bind(&faculty.name)
    .bind(&faculty.email)
    .bind(&faculty.department)
    .bind(serde_json::to_string(&faculty.assignments)?)
    .bind(&faculty.faculty_id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Faculty {}", faculty.faculty_id)));
    }
    Ok(())
}

/// Delete a faculty member and cascade to their canonical assignments.
pub async fn delete(db: &SqlitePool, faculty_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM faculty WHERE faculty_id = ?")
        .bind(faculty_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Faculty {}", faculty_id)));
    }

    sqlx::query("DELETE FROM assignments WHERE faculty_id = ?")
        .bind(faculty_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Projection slots for one faculty, or None when the faculty row is
/// missing. Used by the projection synchronizer, which treats a missing
/// owner as non-fatal.
pub async fn load_slots(db: &SqlitePool, faculty_id: &str) -> Result<Option<Vec<TeachingSlot>>> {
    let row = sqlx::query("SELECT assignments FROM faculty WHERE faculty_id = ?")
        .bind(faculty_id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|r| decode_slots(faculty_id, &r.get::<String, _>("assignments"))))
}

/// Replace a faculty's projection array wholesale.
pub async fn store_slots(db: &SqlitePool, faculty_id: &str, slots: &[TeachingSlot]) -> Result<()> {
    sqlx::query("UPDATE faculty SET assignments = ? WHERE faculty_id = ?")
        .bind(serde_json::to_string(slots)?)
        .bind(faculty_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Faculty whose projection contains a slot covering the query cohort, with
/// each faculty's slot list filtered down to the matching subset (the
/// student dashboard's "who teaches me" view).
pub async fn teaching_faculty_for(db: &SqlitePool, query: &CohortQuery) -> Result<Vec<Faculty>> {
    let all = list(db).await?;
    Ok(all
        .into_iter()
        .filter_map(|mut faculty| {
            faculty
                .assignments
                .retain(|slot| cohort::matches(&slot.record_cohort(), query));
            if faculty.assignments.is_empty() {
                None
            } else {
                Some(faculty)
            }
        })
        .collect())
}
