//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods over a
//! generic Postgres executor, so the same method works against the pool
//! (`&pool`) and inside an ambient transaction (`&mut *tx`). The rollback
//! reconciler relies on this: it composes many store mutations and one
//! ledger append under a single transaction.

pub mod location_repo;
pub mod location_version_repo;
pub mod membership_repo;
pub mod project_repo;
pub mod user_repo;

pub use location_repo::LocationRepo;
pub use location_version_repo::LocationVersionRepo;
pub use membership_repo::MembershipRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
