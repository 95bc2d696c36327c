//! Version ledger entity model and DTOs.
//!
//! One row per accepted mutation to a location. Rows are immutable once
//! written (no `updated_at`); the BIGSERIAL `id` is the authoritative
//! replay order.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use waypoint_core::error::CoreError;
use waypoint_core::geometry::GeoPoint;
use waypoint_core::timeline::{LocationAttrs, Operation, VersionRecord};
use waypoint_core::types::{DbId, Timestamp};

/// A single ledger entry: the full attribute snapshot of one location as it
/// stood *after* the recorded operation (for `delete`, immediately before).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationVersion {
    pub id: DbId,
    pub project_id: DbId,
    pub location_id: DbId,
    pub user_id: Option<DbId>,
    pub operation: String,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<Json<Vec<GeoPoint>>>,
    pub created_at: Timestamp,
}

impl LocationVersion {
    /// The attribute snapshot carried by this entry.
    pub fn attrs(&self) -> LocationAttrs {
        LocationAttrs {
            latitude: self.latitude,
            longitude: self.longitude,
            label: self.label.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            boundary: self.boundary.as_ref().map(|json| json.0.clone()),
        }
    }

    /// View this row as a storage-independent replay record.
    pub fn to_record(&self) -> Result<VersionRecord, CoreError> {
        Ok(VersionRecord {
            entry_id: self.id,
            location_id: self.location_id,
            operation: Operation::parse(&self.operation)?,
            attrs: self.attrs(),
        })
    }
}

/// Convert a ledger slice into replay records, preserving order.
pub fn to_records(entries: &[LocationVersion]) -> Result<Vec<VersionRecord>, CoreError> {
    entries.iter().map(LocationVersion::to_record).collect()
}

/// DTO for appending a ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocationVersion {
    pub project_id: DbId,
    pub location_id: DbId,
    pub user_id: Option<DbId>,
    pub operation: Operation,
    pub attrs: LocationAttrs,
}
