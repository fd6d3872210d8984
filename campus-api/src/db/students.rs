//! Student store queries

use campus_common::cohort;
use campus_common::models::{Faculty, Student};
use campus_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn student_from_row(row: &SqliteRow) -> Student {
    Student {
        sid: row.get("sid"),
        name: row.get("name"),
        email: row.get("email"),
        year: row.get("year"),
        semester: row.get("semester"),
        branch: row.get("branch"),
        section: row.get("section"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

pub async fn list(db: &SqlitePool) -> Result<Vec<Student>> {
    let rows = sqlx::query("SELECT * FROM students ORDER BY sid")
        .fetch_all(db)
        .await?;
    Ok(rows.iter().map(student_from_row).collect())
}

pub async fn get(db: &SqlitePool, sid: &str) -> Result<Student> {
    let row = sqlx::query("SELECT * FROM students WHERE sid = ?")
        .bind(sid)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Student {}", sid)))?;
    Ok(student_from_row(&row))
}

pub async fn insert(db: &SqlitePool, student: &Student) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO students (sid, name, email, year, semester, branch, section, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&student.sid)
    .bind(&student.name)
    .bind(&student.email)
    .bind(student.year)
    .bind(student.semester)
    .bind(&student.branch)
    .bind(&student.section)
    .bind(student.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update(db: &SqlitePool, student: &Student) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = ?, email = ?, year = ?, semester = ?, branch = ?, section = ?
        WHERE sid = ?
        "#,
    )
    .bind(&student.name)
    .bind(&student.email)
    .bind(student.year)
    .bind(student.semester)
    .bind(&student.branch)
    .bind(&student.section)
    .bind(&student.sid)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Student {}", student.sid)));
    }
    Ok(())
}

pub async fn delete(db: &SqlitePool, sid: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM students WHERE sid = ?")
        .bind(sid)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Student {}", sid)));
    }
    Ok(())
}

/// Students covered by any of the faculty's projection slots (the faculty
/// dashboard roster). A faculty with no slots gets an empty roster rather
/// than everyone.
pub async fn students_for_faculty(db: &SqlitePool, faculty: &Faculty) -> Result<Vec<Student>> {
    let cohorts: Vec<_> = faculty
        .assignments
        .iter()
        .map(|slot| slot.record_cohort())
        .collect();

    let students = list(db).await?;
    Ok(students
        .into_iter()
        .filter(|student| {
            let query = student.cohort_query();
            cohorts.iter().any(|cohort| cohort::matches(cohort, &query))
        })
        .collect())
}
