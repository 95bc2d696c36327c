//! Repository for the `project_members` table.

use sqlx::PgExecutor;
use waypoint_core::types::DbId;

/// Provides membership operations backing the project access guard.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Add a user to a project. Adding an existing member is a no-op.
    pub async fn add(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Whether the user belongs to the project.
    pub async fn is_member(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(executor)
        .await
    }
}
