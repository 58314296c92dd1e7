//! Application configuration
//!
//! Read from `{config_dir}/flashdeck/config.toml` when it exists:
//! ```toml
//! data_dir = "/home/me/.local/share/flashdeck"
//! backend = "sqlite"          # file | sqlite | memory
//! storage_key = "flashcards"
//! id_strategy = "timestamp"   # timestamp | sequential
//! ```
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::{FlashcardStore, IdStrategy, DEFAULT_STORAGE_KEY};
use crate::kv::{
    FileKeyValueStore, KeyValueStore, KvError, MemoryKeyValueStore, SqliteKeyValueStore,
};

const APP_DIR: &str = "flashdeck";
const CONFIG_FILE: &str = "config.toml";
const SQLITE_FILE: &str = "flashdeck.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to open storage: {0}")]
    Storage(#[from] KvError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which key-value backend holds the flashcards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One file per key under `data_dir/kv`
    #[default]
    File,
    /// SQLite database at `data_dir/flashdeck.db`
    Sqlite,
    /// Nothing is written to disk
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub storage_key: String,
    pub id_strategy: IdStrategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            backend: Backend::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl AppConfig {
    /// Get the default data directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
    }

    /// Get the default config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the configured key-value backend
    pub async fn open_kv(&self) -> Result<Arc<dyn KeyValueStore>> {
        let kv: Arc<dyn KeyValueStore> = match self.backend {
            Backend::File => Arc::new(FileKeyValueStore::open(self.data_dir.join("kv")).await?),
            Backend::Sqlite => {
                Arc::new(SqliteKeyValueStore::open(self.data_dir.join(SQLITE_FILE)).await?)
            }
            Backend::Memory => Arc::new(MemoryKeyValueStore::new()),
        };
        log::info!("Using {:?} storage in {:?}", self.backend, self.data_dir);
        Ok(kv)
    }

    /// Build a flashcard store over the configured backend
    pub async fn open_store(&self) -> Result<FlashcardStore> {
        let kv = self.open_kv().await?;
        Ok(FlashcardStore::with_key(kv, self.storage_key.clone()).with_id_strategy(self.id_strategy))
    }
}
