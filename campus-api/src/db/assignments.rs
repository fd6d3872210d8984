//! Canonical teaching-assignment store queries

use campus_common::cohort::{self, CohortQuery};
use campus_common::models::AssignmentRecord;
use campus_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn assignment_from_row(row: &SqliteRow) -> Result<AssignmentRecord> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| Error::Internal(format!("Bad assignment id: {}", e)))?;
    Ok(AssignmentRecord {
        id,
        faculty_id: row.get("faculty_id"),
        title: row.get("title"),
        description: row.get("description"),
        subject: row.get("subject"),
        year: row.get("year"),
        section: row.get("section"),
        branch: row.get("branch"),
        semester: row.get("semester"),
        due_date: row.get::<Option<DateTime<Utc>>, _>("due_date"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    })
}

pub async fn insert(db: &SqlitePool, record: &AssignmentRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assignments
            (id, faculty_id, title, description, subject, year, section, branch, semester, due_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.faculty_id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.subject)
    .bind(&record.year)
    .bind(&record.section)
    .bind(&record.branch)
    .bind(&record.semester)
    .bind(record.due_date)
    .bind(record.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn get(db: &SqlitePool, id: Uuid) -> Result<AssignmentRecord> {
    let row = sqlx::query("SELECT * FROM assignments WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assignment {}", id)))?;
    assignment_from_row(&row)
}

pub async fn update(db: &SqlitePool, record: &AssignmentRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE assignments
        SET faculty_id = ?, title = ?, description = ?, subject = ?,
            year = ?, section = ?, branch = ?, semester = ?, due_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.faculty_id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.subject)
    .bind(&record.year)
    .bind(&record.section)
    .bind(&record.branch)
    .bind(&record.semester)
    .bind(record.due_date)
    .bind(record.id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Assignment {}", record.id)));
    }
    Ok(())
}

/// Delete an assignment, returning the removed record so the caller can
/// unsync its projection slot.
pub async fn delete(db: &SqlitePool, id: Uuid) -> Result<AssignmentRecord> {
    let record = get(db, id).await?;
    sqlx::query("DELETE FROM assignments WHERE id = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;
    Ok(record)
}

/// Every canonical assignment. Drives the full projection rebuild.
pub async fn list_all(db: &SqlitePool) -> Result<Vec<AssignmentRecord>> {
    let rows = sqlx::query("SELECT * FROM assignments ORDER BY created_at DESC")
        .fetch_all(db)
        .await?;
    rows.iter().map(assignment_from_row).collect()
}

pub async fn list_for_faculty(db: &SqlitePool, faculty_id: &str) -> Result<Vec<AssignmentRecord>> {
    let rows = sqlx::query(
        "SELECT * FROM assignments WHERE faculty_id = ? ORDER BY created_at DESC",
    )
    .bind(faculty_id)
    .fetch_all(db)
    .await?;
    rows.iter().map(assignment_from_row).collect()
}

/// Assignments whose cohort covers the query (a student's dashboard view),
/// newest first. Candidates are fetched and filtered through the membership
/// predicate rather than encoded into SQL, so wildcard and list-valued
/// fields behave identically everywhere.
pub async fn list_for_student(
    db: &SqlitePool,
    query: &CohortQuery,
) -> Result<Vec<AssignmentRecord>> {
    let all = list_all(db).await?;
    Ok(all
        .into_iter()
        .filter(|record| cohort::matches(&record.record_cohort(), query))
        .collect())
}
