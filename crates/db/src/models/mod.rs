//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Plain create DTOs for inserts

pub mod location;
pub mod location_version;
pub mod project;
pub mod user;
