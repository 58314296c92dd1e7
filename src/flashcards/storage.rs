//! Storage operations for flashcards
//!
//! The whole collection lives under one key of a [`KeyValueStore`] as a JSON
//! array:
//! ```json
//! [{"id": 1712345678901, "question": "犬", "answer": "dog", "pronunciation": "inu"}]
//! ```
//!
//! Every mutation reloads the stored collection, applies the change and
//! writes the full array back while holding the store's lock, so mutations
//! are applied in the order they were issued.

use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use super::models::*;
use crate::kv::{KeyValueStore, KvError};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "flashcards";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {field} must not be empty")]
    Validation { field: CardField },

    #[error("Flashcard not found: {0}")]
    NotFound(FlashcardId),

    #[error("Stored data under '{key}' is corrupt: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] KvError),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// How ids are assigned to new cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Milliseconds since the epoch, bumped past the highest existing id
    #[default]
    Timestamp,
    /// One more than the highest existing id, starting at 1
    Sequential,
}

impl IdStrategy {
    /// Pick an id that no card in `collection` uses
    pub fn next_id(self, collection: &Collection) -> FlashcardId {
        let after_max = collection.max_id().map_or(1, |id| id.0.saturating_add(1));
        match self {
            IdStrategy::Timestamp => {
                let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
                FlashcardId(now.max(after_max))
            }
            IdStrategy::Sequential => FlashcardId(after_max),
        }
    }
}

/// Storage manager for flashcard operations
pub struct FlashcardStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    id_strategy: IdStrategy,
    /// Serializes every operation against the storage key
    lock: Mutex<()>,
    /// Collection as of the last successful load or persisted mutation
    snapshot: StdMutex<Collection>,
}

impl FlashcardStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            id_strategy: IdStrategy::default(),
            lock: Mutex::new(()),
            snapshot: StdMutex::new(Collection::new()),
        }
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The collection as of the last successful operation.
    ///
    /// Mutations never start from this copy; they always reload.
    pub fn snapshot(&self) -> Collection {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_snapshot(&self, collection: Collection) {
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = collection,
            Err(poisoned) => *poisoned.into_inner() = collection,
        }
    }

    // ==================== Raw Operations ====================

    async fn read_collection(&self) -> Result<Collection> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            return Ok(Collection::new());
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::CorruptData {
            key: self.key.clone(),
            source,
        })
    }

    async fn write_collection(&self, collection: &Collection) -> Result<()> {
        let json = serde_json::to_string(collection)?;
        self.kv.set(&self.key, &json).await?;
        Ok(())
    }

    // ==================== Collection Operations ====================

    /// Load the stored collection. An absent value is an empty collection.
    pub async fn load(&self) -> Result<Collection> {
        let _guard = self.lock.lock().await;
        let collection = self.read_collection().await?;
        self.set_snapshot(collection.clone());
        Ok(collection)
    }

    /// Load the stored collection, falling back to an empty one when the
    /// stored value cannot be parsed. The parse failure is returned
    /// alongside so the caller can surface it.
    pub async fn load_or_empty(&self) -> Result<(Collection, Option<StoreError>)> {
        match self.load().await {
            Ok(collection) => Ok((collection, None)),
            Err(e @ StoreError::CorruptData { .. }) => {
                log::warn!("Ignoring unreadable flashcards: {}", e);
                self.set_snapshot(Collection::new());
                Ok((Collection::new(), Some(e)))
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the stored collection with `collection`
    pub async fn save(&self, collection: &Collection) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_collection(collection).await?;
        self.set_snapshot(collection.clone());
        log::info!("Saved {} flashcards under '{}'", collection.len(), self.key);
        Ok(())
    }

    /// Wipe the underlying store
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.kv.clear().await?;
        self.set_snapshot(Collection::new());
        log::info!("Cleared flashcard storage");
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Create a new card at the end of the collection
    pub async fn add(
        &self,
        question: &str,
        answer: &str,
        pronunciation: Option<&str>,
    ) -> Result<Flashcard> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection().await?;

        let id = self.id_strategy.next_id(&collection);
        let card = Flashcard::new(id, question.to_string(), answer.to_string())
            .with_pronunciation(pronunciation.unwrap_or_default().to_string())
            .trimmed();
        if let Some(field) = card.blank_field() {
            return Err(StoreError::Validation { field });
        }

        collection.push(card.clone())?;

        self.write_collection(&collection).await?;
        log::info!("Added flashcard {}", card.id);
        self.set_snapshot(collection);
        Ok(card)
    }

    /// Change the provided fields of a card, keeping its id and position
    pub async fn update(&self, id: FlashcardId, fields: FlashcardUpdate) -> Result<Flashcard> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection().await?;

        let mut card = collection
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(id))?;
        fields.apply_to(&mut card);
        let card = card.trimmed();
        if let Some(field) = card.blank_field() {
            return Err(StoreError::Validation { field });
        }

        collection.replace(card.clone());

        self.write_collection(&collection).await?;
        log::info!("Updated flashcard {}", id);
        self.set_snapshot(collection);
        Ok(card)
    }

    /// Remove a card. Removing an id that does not exist is not an error.
    pub async fn delete(&self, id: FlashcardId) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection().await?;

        if collection.remove(id).is_none() {
            log::debug!("Flashcard {} already absent", id);
        }

        self.write_collection(&collection).await?;
        log::info!("Deleted flashcard {}", id);
        self.set_snapshot(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKeyValueStore, MemoryKeyValueStore};
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (FlashcardStore, Arc<MemoryKeyValueStore>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = FlashcardStore::new(kv.clone());
        (store, kv)
    }

    fn card(id: u64, question: &str, answer: &str) -> Flashcard {
        Flashcard::new(FlashcardId(id), question.to_string(), answer.to_string())
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let (store, _kv) = create_test_store();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let (store, _kv) = create_test_store();
        let collection = Collection::try_from(vec![
            card(3, "c", "3"),
            card(1, "a", "1").with_pronunciation("ah".to_string()),
            card(2, "b", "2"),
        ])
        .unwrap();

        store.load().await.unwrap();
        store.save(&collection).await.unwrap();

        assert_eq!(store.load().await.unwrap(), collection);
    }

    #[tokio::test]
    async fn test_add_appends_with_fresh_id() {
        let (store, _kv) = create_test_store();
        store.add("first", "1", None).await.unwrap();
        store.add("second", "2", None).await.unwrap();
        let before = store.load().await.unwrap();

        let added = store.add("third", "3", Some("thurd")).await.unwrap();
        let after = store.load().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last(), Some(&added));
        assert!(!before.contains(added.id));
        assert_eq!(added.pronunciation, "thurd");
    }

    #[tokio::test]
    async fn test_add_trims_fields() {
        let (store, _kv) = create_test_store();
        let added = store.add("  hello ", "\tworld\n", Some(" ")).await.unwrap();

        assert_eq!(added.question, "hello");
        assert_eq!(added.answer, "world");
        assert_eq!(added.pronunciation, "");
    }

    #[tokio::test]
    async fn test_add_validation_leaves_storage_unchanged() {
        let (store, kv) = create_test_store();
        store.add("q", "a", None).await.unwrap();
        let stored = kv.raw(DEFAULT_STORAGE_KEY).await;

        let err = store.add("", "a", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: CardField::Question }));

        let err = store.add("q", "   ", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: CardField::Answer }));

        assert_eq!(kv.raw(DEFAULT_STORAGE_KEY).await, stored);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_field() {
        let (store, _kv) = create_test_store();
        let first = store.add("first", "1", None).await.unwrap();
        let target = store.add("second", "2", Some("sec")).await.unwrap();
        store.add("third", "3", None).await.unwrap();

        let updated = store
            .update(
                target.id,
                FlashcardUpdate {
                    question: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, target.id);
        assert_eq!(updated.question, "x");
        assert_eq!(updated.answer, "2");
        assert_eq!(updated.pronunciation, "sec");

        let collection = store.load().await.unwrap();
        assert_eq!(collection.position(target.id), Some(1));
        assert_eq!(collection.get(first.id), Some(&first));
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let (store, _kv) = create_test_store();
        let err = store
            .update(FlashcardId(42), FlashcardUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(FlashcardId(42))));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_answer() {
        let (store, _kv) = create_test_store();
        let added = store.add("q", "a", None).await.unwrap();

        let err = store
            .update(
                added.id,
                FlashcardUpdate {
                    answer: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation { field: CardField::Answer }));
        assert_eq!(store.load().await.unwrap().get(added.id), Some(&added));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, _kv) = create_test_store();
        let keep = store.add("keep", "1", None).await.unwrap();
        let gone = store.add("gone", "2", None).await.unwrap();

        store.delete(gone.id).await.unwrap();
        let once = store.load().await.unwrap();
        store.delete(gone.id).await.unwrap();
        let twice = store.load().await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
        assert!(twice.contains(keep.id));
    }

    #[tokio::test]
    async fn test_add_update_delete_scenario() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = FlashcardStore::new(kv.clone()).with_id_strategy(IdStrategy::Sequential);

        let added = store.add("2+2=?", "4", None).await.unwrap();
        assert_eq!(added.id, FlashcardId(1));
        assert_eq!(
            kv.raw(DEFAULT_STORAGE_KEY).await.as_deref(),
            Some(r#"[{"id":1,"question":"2+2=?","answer":"4"}]"#)
        );

        store
            .update(
                FlashcardId(1),
                FlashcardUpdate {
                    answer: Some("Four".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            kv.raw(DEFAULT_STORAGE_KEY).await.as_deref(),
            Some(r#"[{"id":1,"question":"2+2=?","answer":"Four"}]"#)
        );

        store.delete(FlashcardId(1)).await.unwrap();
        assert_eq!(kv.raw(DEFAULT_STORAGE_KEY).await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_corrupt_data_falls_back_to_empty() {
        let (store, kv) = create_test_store();
        kv.insert_raw(DEFAULT_STORAGE_KEY, "not json").await;

        assert!(matches!(
            store.load().await,
            Err(StoreError::CorruptData { .. })
        ));

        let (collection, warning) = store.load_or_empty().await.unwrap();
        assert!(collection.is_empty());
        assert!(matches!(warning, Some(StoreError::CorruptData { .. })));
    }

    #[tokio::test]
    async fn test_mutation_does_not_overwrite_corrupt_data() {
        let (store, kv) = create_test_store();
        kv.insert_raw(DEFAULT_STORAGE_KEY, "not json").await;

        assert!(store.add("q", "a", None).await.is_err());
        assert_eq!(kv.raw(DEFAULT_STORAGE_KEY).await.as_deref(), Some("not json"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let (store, kv) = create_test_store();
        let kept = store.add("q", "a", None).await.unwrap();

        kv.set_fail_writes(true);
        let err = store.add("q2", "a2", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));

        // The snapshot still reflects what is durably stored
        assert_eq!(store.snapshot().as_slice(), &[kept]);

        kv.set_fail_writes(false);
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_not_treated_as_corruption() {
        let (store, kv) = create_test_store();
        kv.set_fail_reads(true);

        assert!(matches!(
            store.load_or_empty().await,
            Err(StoreError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_tracks_mutations() {
        let (store, _kv) = create_test_store();
        let a = store.add("a", "1", None).await.unwrap();
        let b = store.add("b", "2", None).await.unwrap();
        assert_eq!(store.snapshot().len(), 2);

        store.delete(a.id).await.unwrap();
        assert_eq!(store.snapshot().as_slice(), &[b]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let kv = Arc::new(MemoryKeyValueStore::new().with_write_delay(Duration::from_millis(5)));
        let store = Arc::new(FlashcardStore::new(kv).with_id_strategy(IdStrategy::Sequential));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add(&format!("q{}", i), "a", None).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let collection = store.load().await.unwrap();
        assert_eq!(collection.len(), 8);
        let ids: Vec<u64> = collection.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_reset_clears_storage() {
        let (store, kv) = create_test_store();
        store.add("q", "a", None).await.unwrap();

        store.reset().await.unwrap();

        assert_eq!(kv.raw(DEFAULT_STORAGE_KEY).await, None);
        assert!(store.snapshot().is_empty());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timestamp_ids_are_unique() {
        let (store, _kv) = create_test_store();
        let a = store.add("a", "1", None).await.unwrap();
        let b = store.add("b", "2", None).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_persists_through_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let kv = Arc::new(FileKeyValueStore::open(temp_dir.path().to_path_buf()).await.unwrap());

        let added = {
            let store = FlashcardStore::new(kv.clone());
            store.add("犬", "dog", Some("inu")).await.unwrap()
        };

        let store = FlashcardStore::new(kv);
        assert_eq!(store.load().await.unwrap().as_slice(), &[added]);
    }
}
