//! File-backed key-value store
//!
//! Directory layout:
//! ```text
//! {data_dir}/
//! └── {url-encoded key}.json
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{KeyValueStore, Result};

const VALUE_EXTENSION: &str = "json";

/// Stores each key as its own file inside `base_path`
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create the store, creating the directory if needed
    pub async fn open(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Get the file path holding a key's value
    fn value_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", urlencoding::encode(key), VALUE_EXTENSION))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path).await {
            Ok(content) => {
                log::debug!("Read {} bytes from {:?}", content.len(), path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write (write to .tmp then rename)
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;
        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(".json") || name.ends_with(".json.tmp") {
                fs::remove_file(&path).await?;
            }
        }

        Ok(())
    }
}
