//! Key-value persistence adapters
//!
//! The flashcard store talks to local storage only through [`KeyValueStore`]:
//! opaque string keys mapped to string values, read and written whole.
//!
//! Available backends:
//! - [`FileKeyValueStore`]: one JSON file per key in a data directory
//! - [`SqliteKeyValueStore`]: a single `kv` table in an SQLite database
//! - [`MemoryKeyValueStore`]: in-process map, mostly for tests

mod file;
mod memory;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

#[derive(Error, Debug)]
pub enum KvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

/// Asynchronous string-keyed storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every key
    async fn clear(&self) -> Result<()>;
}
