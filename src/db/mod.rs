//! Database module: row models, schema and the store handle.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows, plus insertable shapes
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `SchoolStore`, the query executor passed to every operation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use schema::SQLITE_INIT;
pub use sqlite::{SchoolStore, SqlitePool};
