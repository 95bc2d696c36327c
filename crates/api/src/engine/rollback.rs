//! Rollback reconciliation.
//!
//! Reverts are new commits: the ledger only grows forward. A single-
//! location rollback re-applies one historical snapshot; a whole-project
//! rollback reconstructs the historical live set and converges the store
//! onto it with the minimal set of updates, soft-deletes, and
//! re-creations, all inside one per-project-serialized transaction.

use serde::Serialize;
use sqlx::PgPool;
use waypoint_core::error::CoreError;
use waypoint_core::timeline::{self, Operation};
use waypoint_core::types::DbId;
use waypoint_db::models::location::Location;
use waypoint_db::models::location_version::{
    to_records, CreateLocationVersion, LocationVersion,
};
use waypoint_db::repositories::{LocationRepo, LocationVersionRepo};

use crate::error::{AppError, AppResult};

use super::lock_project;

/// What a whole-project rollback did to the live set.
#[derive(Debug, Serialize)]
pub struct ProjectRollbackOutcome {
    /// Locations whose attributes were reverted (tombstones cleared).
    pub restored: u32,
    /// Locations re-created under their historical id.
    pub recreated: u32,
    /// Locations soft-deleted because they did not exist at the target.
    pub deleted: u32,
    /// The single `rollback_project` ledger entry documenting the batch.
    pub version: LocationVersion,
}

/// Revert one location to the state captured by `version_id`.
///
/// The target entry must belong to both the location and the project;
/// anything else is indistinguishable from a missing version to the
/// caller. The revert is applied as a normal update (undeleting first if
/// the row is tombstoned) and documented by one new `rollback` entry.
pub async fn rollback_location(
    pool: &PgPool,
    actor: DbId,
    project_id: DbId,
    location_id: DbId,
    version_id: DbId,
) -> AppResult<(Location, LocationVersion)> {
    let target = LocationVersionRepo::find_by_id(pool, version_id)
        .await?
        .filter(|entry| entry.project_id == project_id && entry.location_id == location_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LocationVersion",
            id: version_id,
        }))?;
    let attrs = target.attrs();

    let mut tx = pool.begin().await?;
    lock_project(&mut tx, project_id).await?;

    LocationRepo::undelete(&mut *tx, location_id).await?;
    let location = LocationRepo::update_attrs(&mut *tx, location_id, &attrs)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id: location_id,
        }))?;

    let version = LocationVersionRepo::append(
        &mut *tx,
        &CreateLocationVersion {
            project_id,
            location_id,
            user_id: Some(actor),
            operation: Operation::Rollback,
            attrs,
        },
    )
    .await?;

    tx.commit().await?;
    Ok((location, version))
}

/// Restore a project's entire live set to the state immediately after
/// `version_id`.
///
/// Replays the ledger up to the target to obtain the desired state, then
/// diffs it against the current live rows and applies the converging
/// mutations. Commit is all-or-nothing; a failure anywhere leaves both the
/// store and the ledger untouched.
pub async fn rollback_project(
    pool: &PgPool,
    actor: DbId,
    project_id: DbId,
    version_id: DbId,
) -> AppResult<ProjectRollbackOutcome> {
    let entries = LocationVersionRepo::list_for_project(pool, project_id).await?;
    let records = to_records(&entries)?;
    let target = timeline::reconstruct_target_state(&records, version_id)?;

    let mut tx = pool.begin().await?;
    lock_project(&mut tx, project_id).await?;

    let live = LocationRepo::list_live(&mut *tx, project_id).await?;

    let mut restored = 0u32;
    let mut recreated = 0u32;
    let mut deleted = 0u32;

    // Alive now but not at the target: tombstone.
    for location in &live {
        if !target.contains_key(&location.id) {
            LocationRepo::soft_delete(&mut *tx, location.id).await?;
            deleted += 1;
        }
    }

    // Alive at the target: overwrite and undelete, or re-create if the row
    // is gone entirely (possible only for rows removed outside this
    // engine, which never hard-deletes).
    for (id, attrs) in &target {
        match LocationRepo::find_any_by_id(&mut *tx, *id).await? {
            Some(_) => {
                LocationRepo::update_attrs(&mut *tx, *id, attrs).await?;
                LocationRepo::undelete(&mut *tx, *id).await?;
                restored += 1;
            }
            None => {
                LocationRepo::insert_with_id(&mut tx, *id, project_id, attrs).await?;
                recreated += 1;
            }
        }
    }

    // One entry documents the whole batch. The representative is the first
    // location of the reconstructed state, which is stable across replays;
    // if the target state is empty, the targeted entry itself stands in.
    let (rep_location_id, rep_attrs) = match target.first() {
        Some((id, attrs)) => (*id, attrs.clone()),
        None => {
            let entry = entries
                .iter()
                .find(|entry| entry.id == version_id)
                .ok_or_else(|| {
                    AppError::InternalError("Rollback target vanished from ledger".into())
                })?;
            (entry.location_id, entry.attrs())
        }
    };

    let version = LocationVersionRepo::append(
        &mut *tx,
        &CreateLocationVersion {
            project_id,
            location_id: rep_location_id,
            user_id: Some(actor),
            operation: Operation::RollbackProject,
            attrs: rep_attrs,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(ProjectRollbackOutcome {
        restored,
        recreated,
        deleted,
        version,
    })
}
