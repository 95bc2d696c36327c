//! Paired write transactions.
//!
//! Every accepted mutation to the live location store appends exactly one
//! ledger entry inside the same transaction. Partial application (row
//! changed without a ledger entry, or vice versa) would permanently break
//! replay, so the pairing is never split and never retried internally.

use sqlx::PgPool;
use waypoint_core::error::CoreError;
use waypoint_core::timeline::{LocationAttrs, Operation};
use waypoint_core::types::DbId;
use waypoint_db::models::location::{CreateLocation, Location};
use waypoint_db::models::location_version::{CreateLocationVersion, LocationVersion};
use waypoint_db::repositories::{LocationRepo, LocationVersionRepo};

use crate::error::{AppError, AppResult};

use super::lock_project;

/// Insert a new location together with its `create` ledger entry.
pub async fn create_location(
    pool: &PgPool,
    actor: DbId,
    input: &CreateLocation,
) -> AppResult<(Location, LocationVersion)> {
    let mut tx = pool.begin().await?;
    lock_project(&mut tx, input.project_id).await?;

    let location = LocationRepo::insert(&mut *tx, input).await?;
    let version = LocationVersionRepo::append(
        &mut *tx,
        &CreateLocationVersion {
            project_id: location.project_id,
            location_id: location.id,
            user_id: Some(actor),
            operation: Operation::Create,
            attrs: location.attrs(),
        },
    )
    .await?;

    tx.commit().await?;
    Ok((location, version))
}

/// Overwrite a live location's attributes together with its `update`
/// ledger entry.
pub async fn update_location(
    pool: &PgPool,
    actor: DbId,
    project_id: DbId,
    location_id: DbId,
    attrs: &LocationAttrs,
) -> AppResult<(Location, LocationVersion)> {
    let mut tx = pool.begin().await?;
    lock_project(&mut tx, project_id).await?;

    let existing = LocationRepo::find_live_by_id(&mut *tx, location_id)
        .await?
        .filter(|location| location.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id: location_id,
        }))?;

    let location = LocationRepo::update_attrs(&mut *tx, existing.id, attrs)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id: location_id,
        }))?;

    let version = LocationVersionRepo::append(
        &mut *tx,
        &CreateLocationVersion {
            project_id,
            location_id: location.id,
            user_id: Some(actor),
            operation: Operation::Update,
            attrs: location.attrs(),
        },
    )
    .await?;

    tx.commit().await?;
    Ok((location, version))
}

/// Tombstone a live location together with its `delete` ledger entry.
///
/// The entry snapshots the attributes as they were immediately before the
/// deletion, for audit purposes.
pub async fn soft_delete_location(
    pool: &PgPool,
    actor: DbId,
    project_id: DbId,
    location_id: DbId,
) -> AppResult<LocationVersion> {
    let mut tx = pool.begin().await?;
    lock_project(&mut tx, project_id).await?;

    let existing = LocationRepo::find_live_by_id(&mut *tx, location_id)
        .await?
        .filter(|location| location.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id: location_id,
        }))?;

    LocationRepo::soft_delete(&mut *tx, existing.id).await?;

    let version = LocationVersionRepo::append(
        &mut *tx,
        &CreateLocationVersion {
            project_id,
            location_id: existing.id,
            user_id: Some(actor),
            operation: Operation::Delete,
            attrs: existing.attrs(),
        },
    )
    .await?;

    tx.commit().await?;
    Ok(version)
}
