//! SQLite backend for the identity store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;
mod update;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_READ_TIMEOUT, SqliteStore, StoreOptions};

#[cfg(test)]
mod tests;
