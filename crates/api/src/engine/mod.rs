//! Location ledger engine.
//!
//! Pairs every live-store mutation with its ledger append inside a single
//! transaction (`writes`), and converges live data onto reconstructed
//! historical states (`rollback`). All transactions on a project's
//! locations serialize through a per-project advisory lock so a rollback
//! never reconciles against a live set that a concurrent writer is
//! mutating; reads are never blocked.

pub mod rollback;
pub mod writes;

use sqlx::PgConnection;
use waypoint_core::types::DbId;

/// Take the per-project advisory lock for the duration of the current
/// transaction.
pub(crate) async fn lock_project(
    conn: &mut PgConnection,
    project_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(project_id)
        .execute(conn)
        .await?;
    Ok(())
}
