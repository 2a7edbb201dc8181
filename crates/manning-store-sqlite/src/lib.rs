//! SQLite backend for the Manning roster store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The roster lives as one JSON value in
//! a key-value table.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{BACKUP_KEY, SqliteStore};
