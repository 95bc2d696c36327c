//! Role name constants.
//!
//! Roles are stored as plain strings on the `users` table and carried in
//! JWT claims. Admins can access every project; members only the projects
//! they belong to.

/// Full administrative access, including every project.
pub const ROLE_ADMIN: &str = "admin";

/// Regular dashboard user; project access is granted through membership.
pub const ROLE_MEMBER: &str = "member";
