//! Version timeline reconstruction.
//!
//! Replays a project's version ledger oldest -> newest to materialize the
//! set of locations alive immediately after each entry. The fold is pure
//! and operates on storage-independent [`VersionRecord`] views, so history
//! display and rollback reconciliation share one deterministic replay.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::GeoPoint;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The kind of mutation a ledger entry documents.
///
/// During replay, `Delete` removes the location from the live set; every
/// other operation overwrites it with the entry's attribute snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Rollback,
    RollbackProject,
}

impl Operation {
    /// String representation for display and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Rollback => "rollback",
            Self::RollbackProject => "rollback_project",
        }
    }

    /// Parse the database representation back into an [`Operation`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "rollback" => Ok(Self::Rollback),
            "rollback_project" => Ok(Self::RollbackProject),
            other => Err(CoreError::Internal(format!(
                "Unknown ledger operation '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Replay inputs and outputs
// ---------------------------------------------------------------------------

/// The mutable attribute tuple of a location.
///
/// Store-only fields (`deleted_at`, row timestamps) are deliberately
/// excluded: a ledger snapshot describes what a location looked like, not
/// its lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAttrs {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<Vec<GeoPoint>>,
}

/// A storage-independent view of one ledger entry, in replay order.
#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub entry_id: DbId,
    pub location_id: DbId,
    pub operation: Operation,
    pub attrs: LocationAttrs,
}

/// One location alive at a point in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotLocation {
    pub location_id: DbId,
    #[serde(flatten)]
    pub attrs: LocationAttrs,
}

/// The full live set immediately after one ledger entry was applied.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub entry_id: DbId,
    pub locations_after: Vec<SnapshotLocation>,
}

/// The terminal accumulator of a bounded replay: location id -> attributes.
///
/// Insertion-ordered so that repeated replays enumerate locations in the
/// same order.
pub type TargetState = IndexMap<DbId, LocationAttrs>;

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Apply one record to the live-set accumulator.
fn apply(alive: &mut TargetState, record: &VersionRecord) {
    match record.operation {
        Operation::Delete => {
            alive.shift_remove(&record.location_id);
        }
        _ => {
            alive.insert(record.location_id, record.attrs.clone());
        }
    }
}

/// Replay `records` (oldest -> newest) and return one [`Snapshot`] per
/// processed entry.
///
/// With `upto_inclusive` set, the fold stops after the matching entry; a
/// cutoff id that never appears is an input error, not an empty result.
/// An empty ledger yields an empty snapshot list.
pub fn reconstruct(
    records: &[VersionRecord],
    upto_inclusive: Option<DbId>,
) -> Result<Vec<Snapshot>, CoreError> {
    let mut alive = TargetState::new();
    let mut snapshots = Vec::with_capacity(records.len());

    for record in records {
        apply(&mut alive, record);
        snapshots.push(Snapshot {
            entry_id: record.entry_id,
            locations_after: alive
                .iter()
                .map(|(id, attrs)| SnapshotLocation {
                    location_id: *id,
                    attrs: attrs.clone(),
                })
                .collect(),
        });
        if upto_inclusive == Some(record.entry_id) {
            return Ok(snapshots);
        }
    }

    match upto_inclusive {
        Some(missing) => Err(CoreError::NotFound {
            entity: "LocationVersion",
            id: missing,
        }),
        None => Ok(snapshots),
    }
}

/// Replay `records` up to and including `upto_inclusive` and return only
/// the terminal accumulator: the target state a rollback converges to.
pub fn reconstruct_target_state(
    records: &[VersionRecord],
    upto_inclusive: DbId,
) -> Result<TargetState, CoreError> {
    let mut alive = TargetState::new();
    for record in records {
        apply(&mut alive, record);
        if record.entry_id == upto_inclusive {
            return Ok(alive);
        }
    }
    Err(CoreError::NotFound {
        entity: "LocationVersion",
        id: upto_inclusive,
    })
}
