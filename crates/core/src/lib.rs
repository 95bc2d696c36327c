//! Waypoint domain core.
//!
//! Zero-internal-dependency types and logic shared by the database and API
//! layers: id/timestamp aliases, the core error type, role constants,
//! coordinate/boundary normalization, and the version timeline
//! reconstructor.

pub mod error;
pub mod geometry;
pub mod roles;
pub mod timeline;
pub mod types;
