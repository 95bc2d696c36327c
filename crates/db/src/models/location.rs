//! Location entity model and DTOs.
//!
//! A location is a project-scoped spatial marker: a representative point
//! (`latitude`/`longitude`), optional display text, and an optional polygon
//! boundary stored as canonical JSONB. Rows are soft-deleted via
//! `deleted_at` and never physically removed, so the version ledger's
//! `location_id` references stay resolvable forever.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use waypoint_core::geometry::GeoPoint;
use waypoint_core::timeline::LocationAttrs;
use waypoint_core::types::{DbId, Timestamp};

/// A live (or tombstoned) spatial marker.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub project_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<Json<Vec<GeoPoint>>>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    /// The mutable attribute tuple of this row, as the ledger snapshots it.
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
}

/// DTO for inserting a new location. Coordinates and boundary have already
/// been validated and normalized by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocation {
    pub project_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<Vec<GeoPoint>>,
}
