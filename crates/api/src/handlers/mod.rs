//! HTTP handler functions, one module per resource.

pub mod auth;
pub mod health;
pub mod history;
pub mod locations;
pub mod projects;
