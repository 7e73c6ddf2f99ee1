// Postgres storage layer with sqlx
//
// This crate provides the database implementation for the core trait:
// - DbEventsBackend: implements EventsBackend over the five tracking tables

pub mod backend;
pub mod models;
pub mod repositories;

pub use backend::DbEventsBackend;
pub use models::*;
pub use repositories::*;
