#![forbid(unsafe_code)]

//! Persistence adapters behind the key-value blob contract the progress
//! store consumes: an in-memory map for tests and prototyping, and a
//! SQLite-backed store for the real app.

pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryKvStore, KeyValueStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteKvStore};
