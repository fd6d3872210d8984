//! Projection synchronizer tests
//!
//! Exercises the dual-write sync hooks and the full rebuild directly
//! against the store, including the drift scenarios the HTTP layer never
//! produces on its own: skipped hooks, duplicate tuples, and churn.

use campus_api::{db, projection};
use campus_common::models::{AssignmentRecord, Faculty, TeachingSlot};
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    db::init_schema(&pool).await.expect("Should init schema");
    pool
}

async fn insert_faculty(pool: &SqlitePool, faculty_id: &str) {
    let faculty = Faculty {
        faculty_id: faculty_id.to_string(),
        name: "Test Faculty".to_string(),
        email: format!("{}@example.edu", faculty_id),
        department: "CSE".to_string(),
        assignments: Vec::new(),
        created_at: Utc::now(),
    };
    db::faculty::insert(pool, &faculty).await.unwrap();
}

fn record(faculty_id: &str, subject: &str, year: &str, section: &str, branch: Option<&str>) -> AssignmentRecord {
    AssignmentRecord {
        id: Uuid::new_v4(),
        faculty_id: faculty_id.to_string(),
        title: format!("{} worksheet", subject),
        description: None,
        subject: subject.to_string(),
        year: year.to_string(),
        section: section.to_string(),
        branch: branch.map(String::from),
        semester: None,
        due_date: None,
        created_at: Utc::now(),
    }
}

async fn slots_of(pool: &SqlitePool, faculty_id: &str) -> Vec<TeachingSlot> {
    db::faculty::load_slots(pool, faculty_id)
        .await
        .unwrap()
        .expect("faculty should exist")
}

// =============================================================================
// Incremental hooks
// =============================================================================

#[tokio::test]
async fn test_on_create_appends_slot_once() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let rec = record("F001", "Security", "3", "A", Some("CSE"));
    db::assignments::insert(&pool, &rec).await.unwrap();
    projection::on_create(&pool, &rec).await;
    // Replaying the hook must not duplicate the slot
    projection::on_create(&pool, &rec).await;

    let slots = slots_of(&pool, "F001").await;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].subject, "Security");
}

#[tokio::test]
async fn test_on_create_dedupes_semester_variants() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let mut a = record("F001", "Security", "3", "A", Some("CSE"));
    a.semester = Some("5".to_string());
    let mut b = record("F001", "Security", "3", "A", Some("CSE"));
    b.semester = Some("6".to_string());

    projection::on_create(&pool, &a).await;
    // Same 4-tuple, different semester: identity ignores semester, so this
    // is a projection no-op
    projection::on_create(&pool, &b).await;

    let slots = slots_of(&pool, "F001").await;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].semester.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_on_create_for_missing_faculty_is_non_fatal() {
    let pool = setup_pool().await;

    let rec = record("GHOST", "Security", "3", "A", Some("CSE"));
    // Must log and skip, not panic or error
    projection::on_create(&pool, &rec).await;
}

#[tokio::test]
async fn test_on_update_replaces_slot() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let old = record("F001", "Security", "3", "A", Some("CSE"));
    projection::on_create(&pool, &old).await;

    let mut new = old.clone();
    new.section = "B".to_string();
    projection::on_update(&pool, &old, &new).await;

    let slots = slots_of(&pool, "F001").await;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].section, "B");
}

#[tokio::test]
async fn test_on_update_across_faculty_moves_slot() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;
    insert_faculty(&pool, "F002").await;

    let old = record("F001", "Security", "3", "A", Some("CSE"));
    projection::on_create(&pool, &old).await;

    let mut new = old.clone();
    new.faculty_id = "F002".to_string();
    projection::on_update(&pool, &old, &new).await;

    assert_eq!(slots_of(&pool, "F001").await.len(), 0);
    assert_eq!(slots_of(&pool, "F002").await.len(), 1);
}

#[tokio::test]
async fn test_on_delete_ignores_semester_when_matching() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let mut stored = record("F001", "Security", "3", "A", Some("CSE"));
    stored.semester = Some("5".to_string());
    projection::on_create(&pool, &stored).await;

    // The delete sees a record whose semester has since drifted
    let mut removed = stored.clone();
    removed.semester = Some("6".to_string());
    projection::on_delete(&pool, &removed).await;

    assert_eq!(slots_of(&pool, "F001").await.len(), 0);
}

#[tokio::test]
async fn test_slot_equality_is_normalized() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let stored = record("F001", "Security", "3", "A", Some("CSE"));
    projection::on_create(&pool, &stored).await;

    // Differently-spelled but structurally equal tuple
    let variant = record("F001", "Security", "3rd Year", "Section a", Some("cse"));
    projection::on_create(&pool, &variant).await;

    assert_eq!(slots_of(&pool, "F001").await.len(), 1);
}

// =============================================================================
// Full rebuild
// =============================================================================

#[tokio::test]
async fn test_resync_rebuilds_from_canonical_set() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;
    insert_faculty(&pool, "F002").await;

    // Canonical writes whose sync hooks "failed" (never ran)
    for rec in [
        record("F001", "Security", "3", "A", Some("CSE")),
        record("F001", "Networks", "2", "B", Some("CSE")),
        record("F002", "Thermodynamics", "3", "A", Some("MECH")),
    ] {
        db::assignments::insert(&pool, &rec).await.unwrap();
    }

    // Stale garbage in one projection
    db::faculty::store_slots(
        &pool,
        "F002",
        &[TeachingSlot::normalized("1", "Z", "Stale", Some("ECE"), None)],
    )
    .await
    .unwrap();

    let report = projection::resync_all(&pool).await.unwrap();
    assert_eq!(report.faculty_count, 2);
    assert_eq!(report.slot_count, 3);

    let f1 = slots_of(&pool, "F001").await;
    assert_eq!(f1.len(), 2);
    let f2 = slots_of(&pool, "F002").await;
    assert_eq!(f2.len(), 1);
    assert_eq!(f2[0].subject, "Thermodynamics");
}

#[tokio::test]
async fn test_resync_clears_faculty_with_no_records() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    db::faculty::store_slots(
        &pool,
        "F001",
        &[TeachingSlot::normalized("3", "A", "Orphan", Some("CSE"), None)],
    )
    .await
    .unwrap();

    projection::resync_all(&pool).await.unwrap();

    assert_eq!(slots_of(&pool, "F001").await.len(), 0);
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    for rec in [
        record("F001", "Security", "3", "A", Some("CSE")),
        record("F001", "Networks", "2", "B", Some("CSE")),
    ] {
        db::assignments::insert(&pool, &rec).await.unwrap();
    }

    projection::resync_all(&pool).await.unwrap();
    let once = slots_of(&pool, "F001").await;

    projection::resync_all(&pool).await.unwrap();
    let twice = slots_of(&pool, "F001").await;

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_resync_dedupes_structurally_equal_records() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    // Two canonical records with the same 4-tuple (different semesters)
    let mut a = record("F001", "Security", "3", "A", Some("CSE"));
    a.semester = Some("5".to_string());
    let mut b = record("F001", "Security", "3", "A", Some("CSE"));
    b.semester = Some("6".to_string());
    db::assignments::insert(&pool, &a).await.unwrap();
    db::assignments::insert(&pool, &b).await.unwrap();

    let report = projection::resync_all(&pool).await.unwrap();
    assert_eq!(report.slot_count, 1);
    assert_eq!(slots_of(&pool, "F001").await.len(), 1);
}

#[tokio::test]
async fn test_create_delete_churn_converges_after_resync() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    let keep = record("F001", "Security", "3", "A", Some("CSE"));
    let churn = record("F001", "Networks", "2", "B", Some("CSE"));

    db::assignments::insert(&pool, &keep).await.unwrap();
    projection::on_create(&pool, &keep).await;

    // Concurrent-looking create+delete for the same logical assignment,
    // with the delete's sync hook lost
    db::assignments::insert(&pool, &churn).await.unwrap();
    projection::on_create(&pool, &churn).await;
    db::assignments::delete(&pool, churn.id).await.unwrap();
    // on_delete never ran: projection now has a slot with no canonical record

    assert_eq!(slots_of(&pool, "F001").await.len(), 2);

    projection::resync_all(&pool).await.unwrap();

    // Exactly the set implied by the canonical store: never duplicated,
    // never missing
    let slots = slots_of(&pool, "F001").await;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].subject, "Security");
}

#[tokio::test]
async fn test_malformed_projection_column_degrades_to_empty() {
    let pool = setup_pool().await;
    insert_faculty(&pool, "F001").await;

    sqlx::query("UPDATE faculty SET assignments = 'not json' WHERE faculty_id = 'F001'")
        .execute(&pool)
        .await
        .unwrap();

    // Lenient decode: reads see an empty projection instead of an error
    let faculty = db::faculty::get(&pool, "F001").await.unwrap();
    assert_eq!(faculty.assignments.len(), 0);

    // And resync repairs the stored value
    let rec = record("F001", "Security", "3", "A", Some("CSE"));
    db::assignments::insert(&pool, &rec).await.unwrap();
    projection::resync_all(&pool).await.unwrap();
    assert_eq!(slots_of(&pool, "F001").await.len(), 1);
}
