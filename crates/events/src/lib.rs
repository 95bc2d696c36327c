//! Waypoint event bus.
//!
//! In-process publish/subscribe hub that the API layer uses as its
//! commit-success hook: after a ledger transaction commits, the handler
//! publishes a [`PlatformEvent`] describing what changed. Delivery to
//! connected viewers (WebSocket fan-out, digests) is a downstream consumer
//! concern and lives outside this crate.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};

/// Event published after a location is created.
pub const EVENT_LOCATION_CREATED: &str = "location.created";
/// Event published after a location's attributes are overwritten.
pub const EVENT_LOCATION_UPDATED: &str = "location.updated";
/// Event published after a location is soft-deleted.
pub const EVENT_LOCATION_DELETED: &str = "location.deleted";
/// Event published after a single location is rolled back.
pub const EVENT_LOCATION_ROLLED_BACK: &str = "location.rolled_back";
/// Event published after a whole-project rollback converges.
pub const EVENT_PROJECT_ROLLED_BACK: &str = "project.rolled_back";
