//! Database module: record models, schema and the SQLite-backed store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus their insertable forms
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the generic create/find_all/count API

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{
    Appointment, InventoryItem, NewAppointment, NewInventoryItem, NewPatient, Patient,
};
pub use schema::SQLITE_INIT;
pub use sqlite::{ClinicStorage, NewRecord, Record, SqlitePool, connect};
