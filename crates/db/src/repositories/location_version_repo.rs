//! Repository for the `location_versions` table, the append-only ledger.
//!
//! Only inserts and ordered reads exist here. No update or delete is ever
//! issued against this table; the ledger for a project, ordered by `id`,
//! is the single source of truth for replay. `created_at` is display
//! metadata only; timestamps can tie, insertion order cannot.

use sqlx::types::Json;
use sqlx::PgExecutor;
use waypoint_core::types::DbId;

use crate::models::location_version::{CreateLocationVersion, LocationVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, location_id, user_id, operation, latitude, longitude, \
                       label, name, description, boundary, created_at";

/// Provides append and ordered-read operations for the version ledger.
pub struct LocationVersionRepo;

impl LocationVersionRepo {
    /// Append one ledger entry. Pure insert, no business logic; always
    /// called in the same transaction as the store mutation it documents.
    pub async fn append(
        executor: impl PgExecutor<'_>,
        input: &CreateLocationVersion,
    ) -> Result<LocationVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO location_versions
                (project_id, location_id, user_id, operation,
                 latitude, longitude, label, name, description, boundary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LocationVersion>(&query)
            .bind(input.project_id)
            .bind(input.location_id)
            .bind(input.user_id)
            .bind(input.operation.as_str())
            .bind(input.attrs.latitude)
            .bind(input.attrs.longitude)
            .bind(&input.attrs.label)
            .bind(&input.attrs.name)
            .bind(&input.attrs.description)
            .bind(input.attrs.boundary.as_ref().map(Json))
            .fetch_one(executor)
            .await
    }

    /// The full ledger of a project, oldest -> newest by insertion order.
    pub async fn list_for_project(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<LocationVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM location_versions
             WHERE project_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, LocationVersion>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Find a single ledger entry by ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<LocationVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM location_versions WHERE id = $1");
        sqlx::query_as::<_, LocationVersion>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
