//! Repository for the `locations` table, the live location store.
//!
//! Mutating methods never open their own transaction; the caller supplies
//! the ambient one. Every write to this table is paired 1:1 with a ledger
//! append (see `LocationVersionRepo`) inside that same transaction.

use sqlx::types::Json;
use sqlx::{PgConnection, PgExecutor};
use waypoint_core::timeline::LocationAttrs;
use waypoint_core::types::DbId;

use crate::models::location::{CreateLocation, Location};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, latitude, longitude, label, name, description, \
                       boundary, deleted_at, created_at, updated_at";

/// Provides CRUD and tombstone operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Find a live location by ID. Excludes tombstoned rows.
    pub async fn find_live_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a location by ID regardless of tombstone state.
    pub async fn find_any_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all live locations of a project, oldest first.
    pub async fn list_live(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE project_id = $1 AND deleted_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Insert a new location with a store-assigned ID.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (project_id, latitude, longitude, label, name, description, boundary)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(input.project_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.label)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.boundary.as_ref().map(Json))
            .fetch_one(executor)
            .await
    }

    /// Re-create a location under a caller-supplied historical ID, so
    /// existing ledger references stay valid. Keeps the ID sequence ahead
    /// of the inserted value. Must run inside the caller's transaction.
    pub async fn insert_with_id(
        conn: &mut PgConnection,
        id: DbId,
        project_id: DbId,
        attrs: &LocationAttrs,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (id, project_id, latitude, longitude, label, name, description, boundary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let location = sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(project_id)
            .bind(attrs.latitude)
            .bind(attrs.longitude)
            .bind(&attrs.label)
            .bind(&attrs.name)
            .bind(&attrs.description)
            .bind(attrs.boundary.as_ref().map(Json))
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query(
            "SELECT setval(
                pg_get_serial_sequence('locations', 'id'),
                (SELECT GREATEST(MAX(id), 1) FROM locations)
             )",
        )
        .execute(&mut *conn)
        .await?;

        Ok(location)
    }

    /// Overwrite the mutable attributes of a location. Leaves `deleted_at`
    /// untouched, so tombstoned rows can be updated before an undelete.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_attrs(
        executor: impl PgExecutor<'_>,
        id: DbId,
        attrs: &LocationAttrs,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                latitude = $2,
                longitude = $3,
                label = $4,
                name = $5,
                description = $6,
                boundary = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(attrs.latitude)
            .bind(attrs.longitude)
            .bind(&attrs.label)
            .bind(&attrs.name)
            .bind(&attrs.description)
            .bind(attrs.boundary.as_ref().map(Json))
            .fetch_optional(executor)
            .await
    }

    /// Tombstone a location. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE locations SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear a location's tombstone. Returns `true` if a row was restored.
    pub async fn undelete(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE locations SET deleted_at = NULL, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
