//! Database access layer for campus-api
//!
//! SQLite via sqlx. Canonical records live in the `students`, `faculty`,
//! and `assignments` tables; the faculty projection is a JSON array in the
//! `assignments` column of the faculty table.

use campus_common::Result;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod assignments;
pub mod faculty;
pub mod students;

/// Connect to the campus database, creating the file if missing.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_schema(&pool).await?;

    Ok(pool)
}

/// Create tables if they don't exist. Idempotent, safe on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            sid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            year INTEGER NOT NULL,
            semester INTEGER NOT NULL DEFAULT 1,
            branch TEXT NOT NULL DEFAULT 'CSE',
            section TEXT NOT NULL DEFAULT 'A',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS faculty (
            faculty_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            department TEXT NOT NULL DEFAULT 'CSE',
            assignments TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id TEXT PRIMARY KEY,
            faculty_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            subject TEXT NOT NULL,
            year TEXT NOT NULL,
            section TEXT NOT NULL,
            branch TEXT,
            semester TEXT,
            due_date TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_assignments_faculty ON assignments(faculty_id)")
        .execute(pool)
        .await?;

    info!("Database tables initialized (students, faculty, assignments)");

    Ok(())
}
