//! Denormalized projection synchronizer
//!
//! Keeps the JSON slot array embedded on each faculty row consistent with
//! the canonical assignment records, so dashboard reads never join across
//! both structures. The canonical write and the projection write are two
//! sequential writes with no transaction between them: every operation here
//! is best-effort and must never abort the request whose canonical write
//! already succeeded. Drift from partial failures is expected and is
//! recovered by [`resync_all`], the only operation that restores the
//! invariant unconditionally.
//!
//! Slot identity is the normalized (year, section, subject, branch)
//! 4-tuple; semester is not part of the key.

use std::collections::HashMap;

use campus_common::models::{AssignmentRecord, TeachingSlot};
use campus_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db;

/// Outcome of a full projection rebuild, returned to the admin endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResyncReport {
    /// Faculty rows whose projection array was replaced
    pub faculty_count: usize,
    /// Total slots written across all faculty
    pub slot_count: usize,
}

/// Sync hook after a canonical create: append the record's slot to the
/// owning faculty's projection unless an equal slot is already present.
pub async fn on_create(db: &SqlitePool, record: &AssignmentRecord) {
    if let Err(e) = add_slot(db, &record.faculty_id, record.teaching_slot()).await {
        warn!(
            "Failed to sync assignment {} into faculty projection: {}",
            record.id, e
        );
    }
}

/// Sync hook after a canonical update: remove the old record's slot, then
/// add the new one. Two best-effort steps, not an atomic replace; a crash
/// between them leaves zero or two slots until the next resync.
pub async fn on_update(db: &SqlitePool, old: &AssignmentRecord, new: &AssignmentRecord) {
    if let Err(e) = remove_slot(db, &old.faculty_id, &old.teaching_slot()).await {
        warn!(
            "Failed to unsync old assignment {} from faculty projection: {}",
            old.id, e
        );
    }
    on_create(db, new).await;
}

/// Sync hook after a canonical delete: remove the structurally-equal slot.
pub async fn on_delete(db: &SqlitePool, record: &AssignmentRecord) {
    if let Err(e) = remove_slot(db, &record.faculty_id, &record.teaching_slot()).await {
        warn!(
            "Failed to remove assignment {} from faculty projection: {}",
            record.id, e
        );
    }
}

async fn add_slot(db: &SqlitePool, faculty_id: &str, slot: TeachingSlot) -> Result<()> {
    let Some(mut slots) = db::faculty::load_slots(db, faculty_id).await? else {
        // The canonical record is the source of truth; a missing owner
        // just leaves the projection stale until the next resync.
        warn!("Faculty {} not found; skipping projection update", faculty_id);
        return Ok(());
    };

    let key = slot.sync_key();
    if !slots.iter().any(|s| s.sync_key() == key) {
        slots.push(slot);
        db::faculty::store_slots(db, faculty_id, &slots).await?;
    }
    Ok(())
}

async fn remove_slot(db: &SqlitePool, faculty_id: &str, slot: &TeachingSlot) -> Result<()> {
    let Some(mut slots) = db::faculty::load_slots(db, faculty_id).await? else {
        warn!("Faculty {} not found; skipping projection update", faculty_id);
        return Ok(());
    };

    let key = slot.sync_key();
    let before = slots.len();
    slots.retain(|s| s.sync_key() != key);
    if slots.len() != before {
        db::faculty::store_slots(db, faculty_id, &slots).await?;
    }
    Ok(())
}

/// Rebuild every faculty's projection array from the canonical assignment
/// set: group records by owning faculty, replace each array wholesale, and
/// clear the array of faculty with no remaining records.
///
/// Idempotent and safe to run at any time; this is the reconciliation
/// mechanism for drift left behind by best-effort partial failures.
pub async fn resync_all(db: &SqlitePool) -> Result<ResyncReport> {
    let records = db::assignments::list_all(db).await?;

    let mut by_faculty: HashMap<String, Vec<TeachingSlot>> = HashMap::new();
    for record in &records {
        let slots = by_faculty.entry(record.faculty_id.clone()).or_default();
        let slot = record.teaching_slot();
        let key = slot.sync_key();
        if !slots.iter().any(|s| s.sync_key() == key) {
            slots.push(slot);
        }
    }

    let mut faculty_count = 0;
    let mut slot_count = 0;
    for faculty in db::faculty::list(db).await? {
        let slots = by_faculty.remove(&faculty.faculty_id).unwrap_or_default();
        slot_count += slots.len();
        db::faculty::store_slots(db, &faculty.faculty_id, &slots).await?;
        faculty_count += 1;
    }

    info!(
        "Resynced projections for {} faculty ({} slots)",
        faculty_count, slot_count
    );

    Ok(ResyncReport {
        faculty_count,
        slot_count,
    })
}
